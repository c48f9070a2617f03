pub mod dispatcher;
pub mod event;
mod plugin;

pub use dispatcher::{InputDispatcher, InputTarget, Interaction, InteractionState, TimerToken, TouchLock};
pub use event::{Contact, InputQueue, PointerButton, PointerDevice, PointerEvent, PointerPhase};
pub use plugin::InputPlugin;
