//! View-side state that sits between the API and whatever renders it

mod list;

pub use list::RecordList;
