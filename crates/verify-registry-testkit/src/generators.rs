//! Proptest generators for property-based testing.

use proptest::prelude::*;

use verify_registry_core::{Admin, AdminId, Document, Identifier, IDENTIFIER_LENGTH};

/// Document content: any non-empty string.
pub fn content() -> impl Strategy<Value = String> {
    ".{1,200}".prop_map(String::from)
}

/// A value that can be embedded in a selector: non-empty, no control
/// characters, including the JSON metacharacters that must be escaped.
pub fn selector_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_-]{1,24}".prop_map(String::from),
        r#"[a-z"\\{}:,$ ]{1,24}"#.prop_map(String::from),
        "[^\\p{Cc}]{1,24}".prop_map(String::from),
    ]
}

/// A value no selector may carry: it holds a control character or runs past
/// `max_len` bytes.
pub fn unembeddable_value(max_len: usize) -> impl Strategy<Value = String> {
    prop_oneof![
        ("[a-z]{0,8}", "\\p{Cc}", "[a-z]{0,8}").prop_map(|(a, c, b)| format!("{}{}{}", a, c, b)),
        (1usize..64).prop_map(move |extra| "x".repeat(max_len + extra)),
    ]
}

/// A random-strategy identifier.
pub fn identifier() -> impl Strategy<Value = Identifier> {
    proptest::string::string_regex(&format!("[a-zA-Z]{{{}}}", IDENTIFIER_LENGTH))
        .expect("valid identifier regex")
        .prop_map(Identifier::new)
}

/// A message log of one to `max_len` entries.
pub fn messages(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(".{1,40}".prop_map(String::from), 1..=max_len.max(1))
}

/// Generate a document.
pub fn document() -> impl Strategy<Value = Document> {
    (identifier(), content()).prop_map(|(id, content)| Document::new(id, content))
}

/// Parameters for generating an admin.
#[derive(Debug, Clone)]
pub struct AdminParams {
    pub admin_id: String,
    pub username: String,
    pub password: String,
    pub messages: Vec<String>,
}

impl Arbitrary for AdminParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            "[a-zA-Z0-9-]{1,16}",
            selector_value(),
            selector_value(),
            messages(8),
        )
            .prop_map(|(admin_id, username, password, messages)| AdminParams {
                admin_id,
                username,
                password,
                messages,
            })
            .boxed()
    }
}

/// Build an admin whose log holds every message in `params`, in order.
pub fn admin_from_params(params: &AdminParams) -> Admin {
    let mut admin = Admin::new(
        AdminId::new(params.admin_id.clone()),
        params.username.clone(),
        params.password.clone(),
        params.messages[0].clone(),
    );
    for message in &params.messages[1..] {
        admin.append_message(message.clone());
    }
    admin
}
