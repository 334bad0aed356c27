use crate::error::StoreError;

/// Byte-order mark so spreadsheet tools decode Arabic text correctly.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

pub trait Exportable {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

/// Serializes an already-filtered set to comma-delimited UTF-8 with a BOM
/// prefix, one header row, one row per record.
pub fn to_csv<R: Exportable>(records: &[&R]) -> Result<Vec<u8>, StoreError> {
    let mut buffer = Vec::from(UTF8_BOM);
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(R::HEADERS)?;
        for record in records {
            writer.write_record(record.row())?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, &'static str);

    impl Exportable for Row {
        const HEADERS: &'static [&'static str] = &["id", "title"];

        fn row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn output_starts_with_bom_and_header() {
        let rows = [Row("INC-0001", "سرقة معدات")];
        let refs: Vec<&Row> = rows.iter().collect();
        let bytes = to_csv(&refs).unwrap();

        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,title"));
        assert_eq!(lines.next(), Some("INC-0001,سرقة معدات"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let rows = [Row("INC-0002", "breach, north fence")];
        let refs: Vec<&Row> = rows.iter().collect();
        let bytes = to_csv(&refs).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.contains("\"breach, north fence\""));
    }

    #[test]
    fn empty_set_exports_header_only() {
        let refs: Vec<&Row> = Vec::new();
        let bytes = to_csv(&refs).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.trim_end(), "id,title");
    }
}
