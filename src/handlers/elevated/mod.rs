pub mod comments;
pub mod guitarists;
pub mod history;
pub mod news;
pub mod users;
