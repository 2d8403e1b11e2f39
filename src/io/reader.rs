use crate::error::ReconError;
use crate::models::{RawDataset, RawRow, RawValue};
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// 支持的输入文件扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv"];

/// 校验文件扩展名 (不区分大小写)
pub fn validate_file_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

/// 读取 CSV 文件为原始数据集
pub fn read_dataset(path: &Path) -> Result<RawDataset, ReconError> {
    let name = path.display().to_string();
    if !validate_file_extension(&name) {
        return Err(ReconError::UnsupportedFile(name));
    }
    let data = std::fs::read(path)?;
    parse_dataset(&data, &name)
}

/// 解析 CSV 字节; 空白单元格视为空值, 行长度可以不一致
pub fn parse_dataset(data: &[u8], name: &str) -> Result<RawDataset, ReconError> {
    let data = strip_utf8_bom(data);
    if data.is_empty() {
        return Err(ReconError::EmptyFile(name.to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(ReconError::EmptyFile(name.to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let value = match record.get(i) {
                    Some(cell) if !cell.trim().is_empty() => RawValue::Text(cell.to_string()),
                    _ => RawValue::Empty,
                };
                (h.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    tracing::info!("读取 {}: {} 列, {} 行", name, headers.len(), rows.len());
    Ok(RawDataset::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check() {
        assert!(validate_file_extension("orders.csv"));
        assert!(validate_file_extension("ORDERS.CSV"));
        assert!(!validate_file_extension("orders.xlsx"));
        assert!(!validate_file_extension("orders"));
    }

    #[test]
    fn parses_with_bom_and_ragged_rows() {
        let data = "\u{feff}订单号,商品名称,实付金额\n1001,笔,¥12.5\n1002,,\n1003\n";
        let ds = parse_dataset(data.as_bytes(), "test.csv").unwrap();

        assert_eq!(ds.headers, vec!["订单号", "商品名称", "实付金额"]);
        assert_eq!(ds.rows.len(), 3);
        assert_eq!(ds.rows[0]["实付金额"], RawValue::Text("¥12.5".into()));
        assert_eq!(ds.rows[1]["商品名称"], RawValue::Empty);
        assert_eq!(ds.rows[2]["实付金额"], RawValue::Empty);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            parse_dataset(b"", "empty.csv"),
            Err(ReconError::EmptyFile(_))
        ));
    }
}
