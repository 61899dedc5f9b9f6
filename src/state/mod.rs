//! State machines module
//!
//! Client-facing flows modelled as explicit state machines: notification
//! display, the registration wizard and the drawer keypad.

pub mod keypad;
pub mod notification_display;
pub mod registration_wizard;

// Re-export commonly used state components
pub use keypad::{Keypad, KeypadEvent, KeypadState};
pub use notification_display::{ActionEffect, DisplayEvent, DisplayPhase, DisplayTimings, NotificationCenter};
pub use registration_wizard::{
    RegistrantDetails, RegistrationGateway, RegistrationSubmission, RegistrationWizard, WizardStep,
};
