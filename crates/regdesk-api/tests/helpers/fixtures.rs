//! Test fixtures: PDF blobs and registration forms.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};

/// Minimal valid single-page PDF bytes.
pub fn create_test_pdf() -> Vec<u8> {
    b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>
endobj
xref
0 4
0000000000 65535 f 
0000000009 00000 n 
0000000058 00000 n 
0000000115 00000 n 
trailer
<< /Size 4 /Root 1 0 R >>
startxref
190
%%EOF
"
    .to_vec()
}

/// A PDF-typed blob of exactly `len` bytes.
pub fn create_pdf_of_size(len: usize) -> Vec<u8> {
    let mut data = create_test_pdf();
    data.resize(len, b' ');
    data
}

pub fn pdf_part(file_name: &str, data: Vec<u8>) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type("application/pdf")
}

/// Text fields of a valid registration, with canonical names.
pub fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "  jane   doe "),
        ("email", "Jane.Doe@Example.COM"),
        ("student_id", "12345678901"),
        ("program", "informatics engineering"),
        ("class_section", "a"),
    ]
}

pub fn form_with_fields(fields: &[(&str, &str)]) -> MultipartForm {
    fields
        .iter()
        .fold(MultipartForm::new(), |form, (name, value)| {
            form.add_text(name.to_string(), value.to_string())
        })
}

/// A complete, valid registration form.
pub fn valid_form() -> MultipartForm {
    form_with_fields(&valid_fields())
        .add_part("cv", pdf_part("cv.pdf", create_test_pdf()))
        .add_part("transcript", pdf_part("transcript.pdf", create_test_pdf()))
}
