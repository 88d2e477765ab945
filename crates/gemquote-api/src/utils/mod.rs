pub mod forwarded_for;
pub mod upload;
