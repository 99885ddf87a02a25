use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, FixedOffset};
use mdoffice_babel::formats::eml::{encode_subject, render_eml_at, EmailDraft, Priority};
use mdoffice_babel::FormatError;

fn fixed_date() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-03-01T09:30:00+01:00").expect("valid date")
}

fn render(draft: &EmailDraft) -> String {
    String::from_utf8(render_eml_at(draft, fixed_date()).expect("draft renders"))
        .expect("eml is ASCII")
}

fn split(eml: &str) -> (&str, &str) {
    eml.split_once("\r\n\r\n").expect("headers end with a blank line")
}

fn decode_words(header: &str) -> String {
    header
        .split("\r\n ")
        .map(|word| {
            let encoded = word
                .strip_prefix("=?utf-8?b?")
                .and_then(|w| w.strip_suffix("?="))
                .expect("encoded word");
            String::from_utf8(STANDARD.decode(encoded).expect("base64")).expect("utf-8")
        })
        .collect()
}

#[test]
fn test_draft_headers() {
    let mut draft = EmailDraft::new("Weekly sync", "<p>Agenda</p>");
    draft.to = vec!["ana@example.cz".to_string(), "bo@example.cz".to_string()];
    draft.cc = vec!["lead@example.cz".to_string()];
    draft.priority = Priority::High;

    let eml = render(&draft);
    let (headers, _) = split(&eml);

    assert!(headers.contains("To: ana@example.cz, bo@example.cz\r\n"));
    assert!(headers.contains("Cc: lead@example.cz\r\n"));
    assert!(!headers.contains("Bcc:"));
    assert!(headers.contains("Date: Fri, 1 Mar 2024 09:30:00 +0100\r\n"));
    assert!(headers.contains("X-Unsent: 1\r\n"));
    assert!(headers.contains("X-Priority: 1\r\n"));
    assert!(headers.contains("Importance: High\r\n"));
    assert!(headers.contains("Content-Language: cs-CZ\r\n"));
    assert!(headers.contains("Content-Type: text/html; charset=\"utf-8\"\r\n"));
    assert!(headers.contains("Content-Transfer-Encoding: base64"));
}

#[test]
fn test_body_is_wrapped_base64_of_the_styled_page() {
    let mut draft = EmailDraft::new("Hi", "<h2>Title</h2><p>Příliš žluťoučký kůň</p>");
    draft.language = "en-US".to_string();

    let eml = render(&draft);
    let (_, body) = split(&eml);
    assert!(body.split("\r\n").all(|line| line.len() <= 76));

    let joined: String = body.split("\r\n").collect();
    let html = String::from_utf8(STANDARD.decode(joined).expect("base64 body")).expect("utf-8");
    assert!(html.contains(r#"<body lang="en-US">"#));
    assert!(html.contains("Příliš žluťoučký kůň"));
    assert!(html.contains("rgb(0, 20, 137)"));
}

#[test]
fn test_non_ascii_subjects_survive_folding() {
    let subject = "Pozvánka na čtvrtletní přehled výsledků a plánů oddělení";
    let encoded = encode_subject(subject);

    assert!(encoded.contains("\r\n "));
    assert!(encoded.split("\r\n ").all(|word| word.len() <= 75));
    assert_eq!(decode_words(&encoded), subject);
}

#[test]
fn test_short_subject_is_one_encoded_word() {
    insta::assert_snapshot!(encode_subject("Hi"), @"=?utf-8?b?SGk=?=");
}

#[test]
fn test_blank_subject_or_body_is_rejected() {
    let err = render_eml_at(&EmailDraft::new("  ", "<p>x</p>"), fixed_date()).unwrap_err();
    assert!(matches!(err, FormatError::InvalidInput(_)));

    let err = render_eml_at(&EmailDraft::new("Subject", "\n"), fixed_date()).unwrap_err();
    assert!(matches!(err, FormatError::InvalidInput(_)));
}

#[test]
fn test_priority_names() {
    assert_eq!("LOW".parse::<Priority>().expect("known"), Priority::Low);
    assert_eq!(" normal ".parse::<Priority>().expect("known"), Priority::Normal);
    assert!(matches!(
        "urgent".parse::<Priority>(),
        Err(FormatError::InvalidInput(_))
    ));
}

#[test]
fn test_addresses_cannot_inject_headers() {
    let mut draft = EmailDraft::new("Hello", "<p>x</p>");
    draft.to = vec!["victim@example.cz\r\nBcc: spy@example.cz".to_string()];

    let eml = render(&draft);
    let (headers, _) = split(&eml);
    assert!(!headers.contains("\r\nBcc:"));
}
