// tests/integration/identifier_normalization.rs
//! Identifier normalization through the public API.

use notion_blocks::{check_id_length, normalize, AppError, BlockId};
use pretty_assertions::assert_eq;

const CANONICAL: &str = "1429989f-e8ac-4eff-bc3e-7404be81a66e";

#[test]
fn accepted_inputs_share_one_canonical_form() {
    let inputs = [
        "1429989fe8ac4effbc3e7404be81a66e",
        CANONICAL,
        "https://www.notion.so/My-Page-1429989fe8ac4effbc3e7404be81a66e",
        "http://notion.so/workspace/Some-Title-1429989fe8ac4effbc3e7404be81a66e",
    ];

    for input in inputs {
        assert_eq!(normalize(input).unwrap().as_str(), CANONICAL, "input: {input}");
    }
}

#[test]
fn rejected_inputs_name_the_input() {
    for input in ["", "hello", "1429989fe8ac4eff", "https://www.notion.so/My-Page"] {
        let err = normalize(input).unwrap_err();
        assert!(err.to_string().contains(&format!("'{input}'")));

        let app_error: AppError = err.into();
        assert!(app_error.is_invalid_identifier());
    }
}

#[test]
fn canonical_ids_are_stable() {
    let id = normalize(CANONICAL).unwrap();
    let again = normalize(id.as_str()).unwrap();
    assert_eq!(id, again);
    assert_eq!(id.to_compact(), "1429989fe8ac4effbc3e7404be81a66e");
    assert_eq!(CANONICAL.parse::<BlockId>().unwrap(), id);
}

#[test]
fn length_check_counts_characters() {
    assert!(check_id_length("1429989fe8ac4effbc3e7404be81a66e"));
    assert!(!check_id_length(CANONICAL));
    assert!(!check_id_length(""));
}
