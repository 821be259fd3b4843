pub mod add;
pub mod delete;
pub mod discover;
pub mod like;
pub mod login;
pub mod logout;
pub mod my_events;
pub mod register;
pub mod sync;
