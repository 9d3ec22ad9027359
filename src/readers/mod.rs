pub mod cancel;
pub mod fields;
pub mod record_reader;

pub use cancel::CancelFlag;
pub use fields::{coerce_compliance_flag, coerce_result, decode_input};
pub use record_reader::{IngestOutput, RecordReader};
