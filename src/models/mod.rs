pub mod accommodations;
pub mod contracts;
pub mod events;
pub mod profiles;
pub mod users;
