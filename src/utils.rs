mod verify_file_existence;
pub use verify_file_existence::verify_file_existence;
