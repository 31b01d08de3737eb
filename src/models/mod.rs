pub mod appointment;
pub mod catalog;
pub mod doctor;
pub mod enums;
pub mod filters;
pub mod notification;
pub mod patient;

pub use appointment::*;
pub use catalog::*;
pub use doctor::*;
pub use enums::*;
pub use filters::*;
pub use lab_test::*;
pub use notification::*;
pub use patient::*;
