pub mod book;
pub mod borrowing;
pub mod copy;
pub mod librarian;
pub mod publisher;
pub mod user;

pub use book::Book;
pub use borrowing::Borrowing;
pub use copy::Copy;
pub use librarian::Librarian;
pub use publisher::Publisher;
pub use user::User;
