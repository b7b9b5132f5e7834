use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RecordError;

/// The raw strings collected by the form. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub person_name: String,
    pub company_name: String,
    pub designation: String,
    pub phone_no: String,
    pub email: String,
    pub any_link: String,
    pub address: String,
    /// Logo as a `data:` URI, empty when none was uploaded.
    pub logo: String,
}

/// Form fields addressable by an edit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PersonName,
    CompanyName,
    Designation,
    PhoneNo,
    Email,
    AnyLink,
    Address,
}

impl ContactForm {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::PersonName => self.person_name = value,
            Field::CompanyName => self.company_name = value,
            Field::Designation => self.designation = value,
            Field::PhoneNo => self.phone_no = value,
            Field::Email => self.email = value,
            Field::AnyLink => self.any_link = value,
            Field::Address => self.address = value,
        }
    }
}

/// The four fields a record cannot be built without, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    PersonName,
    CompanyName,
    PhoneNo,
    Email,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [
        RequiredField::PersonName,
        RequiredField::CompanyName,
        RequiredField::PhoneNo,
        RequiredField::Email,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PersonName => "Person Name",
            Self::CompanyName => "Company Name",
            Self::PhoneNo => "Phone No",
            Self::Email => "Email",
        }
    }

    fn value(self, form: &ContactForm) -> &str {
        match self {
            Self::PersonName => &form.person_name,
            Self::CompanyName => &form.company_name,
            Self::PhoneNo => &form.phone_no,
            Self::Email => &form.email,
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How field values are written into the vCard text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escaping {
    /// Values are inserted as typed. A `;`, `,` or newline in a value breaks
    /// the record for strict readers.
    #[default]
    Verbatim,
    /// Backslash-escape `\`, `;`, `,` and newlines as vCard text values require.
    Rfc6350,
}

impl Escaping {
    fn apply<'a>(self, value: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            Self::Verbatim => value.into(),
            Self::Rfc6350 => {
                if !value.contains(['\\', ';', ',', '\n', '\r']) {
                    return value.into();
                }
                let mut out = String::with_capacity(value.len() + 8);
                let mut chars = value.chars().peekable();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        ';' => out.push_str("\\;"),
                        ',' => out.push_str("\\,"),
                        '\r' => {
                            if chars.peek() == Some(&'\n') {
                                chars.next();
                            }
                            out.push_str("\\n");
                        }
                        '\n' => out.push_str("\\n"),
                        c => out.push(c),
                    }
                }
                out.into()
            }
        }
    }
}

/// A validated contact. Fields are trimmed; optional ones may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    person_name: String,
    company_name: String,
    designation: String,
    phone_no: String,
    email: String,
    any_link: String,
    address: String,
}

/// vCard text derived from a [`ContactRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for EncodedPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate the form and freeze it into a record.
pub fn build_record(form: &ContactForm) -> Result<ContactRecord, RecordError> {
    if let Some(field) = RequiredField::ALL
        .into_iter()
        .find(|f| f.value(form).trim().is_empty())
    {
        return Err(RecordError::MissingRequiredField { field });
    }

    Ok(ContactRecord {
        person_name: form.person_name.trim().to_string(),
        company_name: form.company_name.trim().to_string(),
        designation: form.designation.trim().to_string(),
        phone_no: form.phone_no.trim().to_string(),
        email: form.email.trim().to_string(),
        any_link: form.any_link.trim().to_string(),
        address: form.address.trim().to_string(),
    })
}

/// Validate the form and produce its verbatim vCard payload.
pub fn build_payload(form: &ContactForm) -> Result<EncodedPayload, RecordError> {
    Ok(build_record(form)?.to_payload(Escaping::Verbatim))
}

impl ContactRecord {
    pub fn person_name(&self) -> &str {
        &self.person_name
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn phone_no(&self) -> &str {
        &self.phone_no
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn any_link(&self) -> &str {
        &self.any_link
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns `(first, last)`. With a single token the last name is empty.
    pub fn split_name(&self) -> (String, String) {
        let mut tokens: Vec<&str> = self.person_name.split_whitespace().collect();
        if tokens.len() > 1 {
            let last = tokens.pop().unwrap_or_default();
            (tokens.join(" "), last.to_string())
        } else {
            (self.person_name.clone(), String::new())
        }
    }

    pub fn to_payload(&self, escaping: Escaping) -> EncodedPayload {
        let (first, last) = self.split_name();
        let e = |v: &str| escaping.apply(v).into_owned();

        let lines = [
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("N:{};{};;;", e(&last), e(&first)),
            format!("FN:{}", e(&self.person_name)),
            format!("ORG:{}", e(&self.company_name)),
            format!("TITLE:{}", e(&self.designation)),
            format!("TEL:{}", e(&self.phone_no)),
            format!("EMAIL:{}", e(&self.email)),
            format!("ADR:;;{};;;;", e(&self.address)),
            format!("URL:{}", e(&self.any_link)),
            "END:VCARD".to_string(),
        ];

        EncodedPayload(lines.join("\n"))
    }

    /// Download name: the person name with whitespace runs turned into hyphens.
    pub fn export_filename(&self) -> String {
        let slug: Vec<&str> = self.person_name.split_whitespace().collect();
        format!("{}-Contact-QR.pdf", slug.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> ContactForm {
        ContactForm {
            person_name: "John Smith".into(),
            company_name: "Acme".into(),
            phone_no: "555-1234".into(),
            email: "j@acme.com".into(),
            ..Default::default()
        }
    }

    fn line<'a>(payload: &'a EncodedPayload, prefix: &str) -> &'a str {
        payload
            .as_str()
            .lines()
            .find(|l| l.starts_with(prefix))
            .unwrap()
    }

    #[test]
    fn test_minimal_contact_lines() {
        let payload = build_payload(&john()).unwrap();
        assert_eq!(line(&payload, "N:"), "N:Smith;John;;;");
        assert_eq!(line(&payload, "ADR:"), "ADR:;;;;;;");
        assert_eq!(line(&payload, "TITLE:"), "TITLE:");
        assert_eq!(line(&payload, "URL:"), "URL:");
    }

    #[test]
    fn test_full_payload_layout() {
        let mut form = john();
        form.designation = "Engineer".into();
        form.address = "1 Main St".into();
        form.any_link = "https://acme.test".into();
        let payload = build_payload(&form).unwrap();
        let expected = "BEGIN:VCARD\nVERSION:3.0\nN:Smith;John;;;\nFN:John Smith\nORG:Acme\n\
                        TITLE:Engineer\nTEL:555-1234\nEMAIL:j@acme.com\nADR:;;1 Main St;;;;\n\
                        URL:https://acme.test\nEND:VCARD";
        assert_eq!(payload.as_str(), expected);
    }

    #[test]
    fn test_deterministic() {
        let a = build_payload(&john()).unwrap();
        let b = build_payload(&john()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_name_with_many_tokens() {
        let mut form = john();
        form.person_name = "Mary  Anne\tvan Dyke".into();
        let record = build_record(&form).unwrap();
        assert_eq!(
            record.split_name(),
            ("Mary Anne van".to_string(), "Dyke".to_string())
        );
        let payload = record.to_payload(Escaping::Verbatim);
        assert_eq!(line(&payload, "N:"), "N:Dyke;Mary Anne van;;;");
    }

    #[test]
    fn test_single_token_name() {
        let mut form = john();
        form.person_name = "Prince".into();
        let payload = build_payload(&form).unwrap();
        assert_eq!(line(&payload, "N:"), "N:;Prince;;;");
        assert_eq!(line(&payload, "FN:"), "FN:Prince");
    }

    #[test]
    fn test_missing_required_fields_in_order() {
        let cases: [(fn(&mut ContactForm), RequiredField); 4] = [
            (|f| f.person_name.clear(), RequiredField::PersonName),
            (|f| f.company_name = "   ".into(), RequiredField::CompanyName),
            (|f| f.phone_no.clear(), RequiredField::PhoneNo),
            (|f| f.email.clear(), RequiredField::Email),
        ];
        for (clear, expected) in cases {
            let mut form = john();
            clear(&mut form);
            assert_eq!(
                build_payload(&form),
                Err(RecordError::MissingRequiredField { field: expected })
            );
        }
    }

    #[test]
    fn test_first_missing_field_wins() {
        let err = build_record(&ContactForm::default()).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingRequiredField {
                field: RequiredField::PersonName
            }
        );
        assert!(err.user_message().contains("Person Name, Company Name, Phone No, and Email"));
    }

    #[test]
    fn test_verbatim_keeps_reserved_characters() {
        let mut form = john();
        form.company_name = "Acme, Inc; Ltd".into();
        let payload = build_payload(&form).unwrap();
        assert_eq!(line(&payload, "ORG:"), "ORG:Acme, Inc; Ltd");
    }

    #[test]
    fn test_rfc6350_escaping() {
        let mut form = john();
        form.company_name = "Acme, Inc; Ltd".into();
        form.address = "Line 1\nLine 2\\x".into();
        let payload = build_record(&form).unwrap().to_payload(Escaping::Rfc6350);
        assert_eq!(line(&payload, "ORG:"), "ORG:Acme\\, Inc\\; Ltd");
        assert_eq!(line(&payload, "ADR:"), "ADR:;;Line 1\\nLine 2\\\\x;;;;");
    }

    #[test]
    fn test_export_filename() {
        let mut form = john();
        form.person_name = " John   Q  Smith ".into();
        let record = build_record(&form).unwrap();
        assert_eq!(record.export_filename(), "John-Q-Smith-Contact-QR.pdf");
    }
}
