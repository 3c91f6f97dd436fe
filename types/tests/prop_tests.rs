use proptest::prelude::*;

use dobverify_types::{NormalizedDate, SubmissionKey, Timestamp, UserId};

proptest! {
    /// NormalizedDate renders ISO text that parses back to the same date.
    #[test]
    fn normalized_date_iso_roundtrip(y in 1000i32..=9999, m in 1u32..=12, d in 1u32..=28) {
        let date = NormalizedDate::from_ymd(y, m, d).unwrap();
        let parsed = NormalizedDate::parse_iso(&date.to_string()).unwrap();
        prop_assert_eq!(parsed, date);
    }

    /// Days past 31 never form a date.
    #[test]
    fn day_past_31_is_never_a_date(y in 1000i32..=9999, m in 1u32..=12, d in 32u32..=99) {
        prop_assert!(NormalizedDate::from_ymd(y, m, d).is_none());
    }

    /// UserId byte order matches numeric order.
    #[test]
    fn user_id_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(UserId::new(a).to_be_bytes() <= UserId::new(b).to_be_bytes(), a <= b);
    }

    /// Distinct keys never share an index encoding.
    #[test]
    fn key_index_is_injective(
        n1 in "[a-zA-Z ]{1,12}", d1 in "[0-9/-]{1,10}",
        n2 in "[a-zA-Z ]{1,12}", d2 in "[0-9/-]{1,10}",
    ) {
        let k1 = SubmissionKey::new(n1, d1);
        let k2 = SubmissionKey::new(n2, d2);
        prop_assert_eq!(k1 == k2, k1.index_bytes() == k2.index_bytes());
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(Timestamp::new(a) <= Timestamp::new(b), a <= b);
    }

    /// Dates survive bincode encoding, as stored by the LMDB backend.
    #[test]
    fn normalized_date_bincode_roundtrip(y in 1800i32..=2100, m in 1u32..=12, d in 1u32..=28) {
        let date = NormalizedDate::from_ymd(y, m, d).unwrap();
        let encoded = bincode::serialize(&date).unwrap();
        let decoded: NormalizedDate = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, date);
    }
}
