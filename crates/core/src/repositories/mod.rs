//! Services over the record store.
//!
//! Each service wraps a [`Store`](crate::Store) handle and owns one kind of record. Mutations
//! take the [`Caller`](crate::Caller) and run the access guards first.

pub mod doctor;
pub mod facility;
pub mod note;
pub mod patient;

#[cfg(test)]
pub(crate) mod test_support;
