pub mod chat;
pub mod discord;
pub mod replay;
pub mod show;
