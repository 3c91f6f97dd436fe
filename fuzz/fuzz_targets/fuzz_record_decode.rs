#![no_main]

use libfuzzer_sys::fuzz_target;

use dobverify_types::{CertificateRecord, Submission};

// Decoding stored values from arbitrary bytes never panics, and whatever
// decodes re-encodes to the same value.
fuzz_target!(|data: &[u8]| {
    if let Ok(submission) = bincode::deserialize::<Submission>(data) {
        let encoded = bincode::serialize(&submission).unwrap();
        assert_eq!(bincode::deserialize::<Submission>(&encoded).unwrap(), submission);
    }
    let _ = bincode::deserialize::<CertificateRecord>(data);
});
