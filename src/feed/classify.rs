use serde_json::Value;

/// Rendering category of one activity row.
///
/// The discriminant doubles as the index of the view-recycling pool the
/// presentation layer keeps per variant, so the order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentationVariant {
    /// Anything without a recognised object type (comments, follows, shares).
    Plain = 0,
    /// A text note.
    Note = 1,
    /// An image post.
    Image = 2,
}

impl PresentationVariant {
    /// Number of distinct variants.
    pub const COUNT: usize = 3;

    /// Pool index for this variant.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Classify an activity payload by the declared type of its nested object.
///
/// Missing or malformed fields never fail: a payload without an `object`
/// member, an `object` that is not a JSON object, or an `objectType` that is
/// absent, non-string or unrecognised all classify as [`PresentationVariant::Plain`].
pub fn classify(payload: &Value) -> PresentationVariant {
    let Some(object) = payload.get("object").and_then(Value::as_object) else {
        return PresentationVariant::Plain;
    };

    match object.get("objectType").and_then(Value::as_str) {
        Some("image") => PresentationVariant::Image,
        Some("note") => PresentationVariant::Note,
        _ => PresentationVariant::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_no_object_is_plain() {
        assert_eq!(classify(&json!({})), PresentationVariant::Plain);
        assert_eq!(
            classify(&json!({"verb": "follow", "content": "x followed y"})),
            PresentationVariant::Plain
        );
    }

    #[test]
    fn test_known_object_types() {
        assert_eq!(
            classify(&json!({"object": {"objectType": "image"}})),
            PresentationVariant::Image
        );
        assert_eq!(
            classify(&json!({"object": {"objectType": "note"}})),
            PresentationVariant::Note
        );
    }

    #[test]
    fn test_unknown_or_missing_type_is_plain() {
        assert_eq!(
            classify(&json!({"object": {"objectType": "comment"}})),
            PresentationVariant::Plain
        );
        assert_eq!(
            classify(&json!({"object": {"id": "tag:x"}})),
            PresentationVariant::Plain
        );
        // Type names are matched exactly
        assert_eq!(
            classify(&json!({"object": {"objectType": "Note"}})),
            PresentationVariant::Plain
        );
    }

    #[test]
    fn test_non_object_members_degrade_to_plain() {
        assert_eq!(
            classify(&json!({"object": "tag:example.com,2013:note"})),
            PresentationVariant::Plain
        );
        assert_eq!(
            classify(&json!({"object": {"objectType": 7}})),
            PresentationVariant::Plain
        );
        assert_eq!(classify(&json!([1, 2, 3])), PresentationVariant::Plain);
    }

    #[test]
    fn test_pool_indices_are_stable() {
        assert_eq!(PresentationVariant::Plain.index(), 0);
        assert_eq!(PresentationVariant::Note.index(), 1);
        assert_eq!(PresentationVariant::Image.index(), 2);
    }

    proptest! {
        #[test]
        fn prop_payload_without_object_is_plain(verb in "[a-z]{0,12}", content in ".{0,40}") {
            let payload = json!({"verb": verb, "content": content});
            prop_assert_eq!(classify(&payload), PresentationVariant::Plain);
        }

        #[test]
        fn prop_other_object_types_are_plain(kind in "[a-z]{0,12}") {
            prop_assume!(kind != "note" && kind != "image");
            let payload = json!({"object": {"objectType": kind}});
            prop_assert_eq!(classify(&payload), PresentationVariant::Plain);
        }
    }
}
