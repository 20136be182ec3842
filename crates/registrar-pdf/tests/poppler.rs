//! End-to-end checks against the real poppler binaries.
//!
//! Ignored by default so the suite stays hermetic; run with
//! `cargo test -p registrar-pdf -- --ignored` on a machine with
//! poppler-utils (`pdfinfo`, `pdftotext`, `pdftocairo`) installed.

use registrar_pdf::{CropTable, RegionCropper, RegisterPdf};

/// Assemble a minimal well-formed PDF with `page_count` blank
/// 770 x 600 pt pages, xref table included.
fn minimal_pdf(page_count: usize) -> Vec<u8> {
  let mut kids = String::new();
  for i in 0..page_count {
    kids.push_str(&format!("{} 0 R ", 3 + 2 * i));
  }

  let mut objects: Vec<String> = vec![
    "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
    format!("<< /Type /Pages /Kids [ {kids}] /Count {page_count} >>"),
  ];
  for i in 0..page_count {
    objects.push(format!(
      "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 770 600] /Contents {} 0 R >>",
      4 + 2 * i
    ));
    objects.push("<< /Length 0 >>\nstream\n\nendstream".to_string());
  }

  let mut out = b"%PDF-1.4\n".to_vec();
  let mut offsets = Vec::new();
  for (n, body) in objects.iter().enumerate() {
    offsets.push(out.len());
    out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", n + 1).as_bytes());
  }

  let xref_at = out.len();
  out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
  out.extend_from_slice(b"0000000000 65535 f \n");
  for offset in offsets {
    out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
  }
  out.extend_from_slice(
    format!(
      "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
      objects.len() + 1
    )
    .as_bytes(),
  );
  out
}

#[tokio::test]
#[ignore = "requires poppler-utils"]
async fn probes_page_count_geometry_and_text() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("register.pdf");
  std::fs::write(&path, minimal_pdf(2)).unwrap();

  let pdf = RegisterPdf::open(&path).await.unwrap();
  assert_eq!(pdf.page_count(), 2);
  assert_eq!(pdf.page_width(), 770.0);
  assert_eq!(pdf.page_height(), 600.0);

  // Blank pages read back as empty text, not as an error.
  let text = pdf.page_text(2).await.unwrap();
  assert!(text.trim().is_empty());
  assert!(pdf.page_text(3).await.is_err());
}

#[tokio::test]
#[ignore = "requires poppler-utils"]
async fn cropped_artifact_is_exactly_one_page_of_band_size() {
  let dir = tempfile::tempdir().unwrap();
  let source = dir.path().join("register.pdf");
  std::fs::write(&source, minimal_pdf(2)).unwrap();

  let pdf = RegisterPdf::open(&source).await.unwrap();
  let cropper = RegionCropper::new(CropTable::default());
  let dest = dir.path().join("MU1053822_SHARMA_1.pdf");

  cropper.crop_student(&pdf, 2, 1, 2, &dest).await.unwrap();

  // Probe the artifact the same way a consumer would.
  let artifact = RegisterPdf::open(&dest).await.unwrap();
  assert_eq!(artifact.page_count(), 1);
  // Band 1 runs y 294..497 over the full page width.
  assert_eq!(artifact.page_width().round(), 770.0);
  assert_eq!(artifact.page_height().round(), 203.0);
}

#[tokio::test]
#[ignore = "requires poppler-utils"]
async fn recropping_overwrites_the_artifact() {
  let dir = tempfile::tempdir().unwrap();
  let source = dir.path().join("register.pdf");
  std::fs::write(&source, minimal_pdf(1)).unwrap();

  let pdf = RegisterPdf::open(&source).await.unwrap();
  let cropper = RegionCropper::new(CropTable::default());
  let dest = dir.path().join("MU1053822_SHARMA_1.pdf");

  cropper.crop_student(&pdf, 1, 0, 1, &dest).await.unwrap();
  cropper.crop_student(&pdf, 1, 0, 1, &dest).await.unwrap();

  // Still a single valid one-page artifact, with the single-student band
  // extension applied (y 91..326).
  let artifact = RegisterPdf::open(&dest).await.unwrap();
  assert_eq!(artifact.page_count(), 1);
  assert_eq!(artifact.page_height().round(), 235.0);
}
