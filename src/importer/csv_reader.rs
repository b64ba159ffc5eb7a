// ==========================================
// 校友名册导入系统 - 表格读取器实现
// ==========================================
// 职责: 上传字节流 → 有序原始行序列（阶段 0）
// 契约: 结构性错误在产出任何行之前快速失败
// ==========================================

use crate::domain::RawAlumniRow;
use crate::importer::error::ImportError;
use csv::ReaderBuilder;
use std::collections::HashMap;

/// 必填列（大小写敏感,精确匹配,表头本身不做 trim）
pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "graduation_year", "degree_program"];

/// 可识别的可选列
pub const OPTIONAL_COLUMNS: [&str; 4] = ["email", "linkedin_url", "imdb_url", "website"];

// ==========================================
// CsvRosterReader - CSV 名册读取器
// ==========================================
pub struct CsvRosterReader;

impl CsvRosterReader {
    /// 解码字节流为有序原始行序列
    ///
    /// # 参数
    /// - content: 上传的文件字节（应为 UTF-8 CSV,首行为表头）
    ///
    /// # 返回
    /// - Ok(Vec<RawAlumniRow>): 行号为 1-based（不含表头）,单元格值已 trim
    /// - Err(ImportError): 结构性错误（编码失败/必填列缺失/CSV 语法错误）
    ///
    /// # 行为
    /// - 未知列忽略,不报错
    /// - 完全空白的行跳过,但仍占用行号
    pub fn read_rows(&self, content: &[u8]) -> Result<Vec<RawAlumniRow>, ImportError> {
        // 编码检查先于 CSV 解析,保证结构性错误的确定性分类
        let text = std::str::from_utf8(content)
            .map_err(|e| ImportError::EncodingError(e.to_string()))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致,缺列按值缺失处理
            .from_reader(text.as_bytes());

        // 读取表头（逐字节保留,不做 trim）
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        // 必填列检查: 全部缺失列一次性报出
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingRequiredColumns(missing));
        }

        // 封闭键集: 只保留声明过的列
        let recognized: Vec<(usize, &str)> = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, h)| {
                REQUIRED_COLUMNS
                    .iter()
                    .chain(OPTIONAL_COLUMNS.iter())
                    .find(|col| *col == h)
                    .map(|col| (idx, *col))
            })
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = idx + 1;

            let mut fields = HashMap::new();
            for (col_idx, column) in &recognized {
                if let Some(value) = record.get(*col_idx) {
                    let trimmed = value.trim();
                    if !trimmed.is_empty() {
                        fields.insert(column.to_string(), trimmed.to_string());
                    }
                }
            }

            // 跳过完全空白的行（行号仍前进,保持与源文件一致）
            if fields.is_empty() && record.iter().all(|v| v.trim().is_empty()) {
                continue;
            }

            rows.push(RawAlumniRow { row_number, fields });
        }

        Ok(rows)
    }

    /// 生成导入模板（表头 + 示例行）
    ///
    /// # 返回
    /// - CSV 文本,供外部 UI 提供下载
    pub fn csv_template(&self) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());

        // 写入失败仅可能因内存写入器,这里不可达
        let _ = writer.write_record([
            "name",
            "graduation_year",
            "degree_program",
            "email",
            "linkedin_url",
            "imdb_url",
            "website",
        ]);
        let _ = writer.write_record([
            "John Smith",
            "2020",
            "Film Production",
            "john.smith@example.com",
            "https://linkedin.com/in/johnsmith",
            "https://www.imdb.com/name/nm1234567",
            "https://johnsmithfilms.com",
        ]);
        let _ = writer.write_record([
            "Jane Doe",
            "2021",
            "Documentary",
            "jane.doe@example.com",
            "",
            "",
            "",
        ]);

        let bytes = writer.into_inner().unwrap_or_default();
        String::from_utf8(bytes).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows_basic() {
        let csv = "name,graduation_year,degree_program\nSarah Chen,2018,Film Production\nMarcus Webb,2019,Animation\n";
        let reader = CsvRosterReader;
        let rows = reader.read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 1);
        assert_eq!(rows[0].get("name"), Some("Sarah Chen"));
        assert_eq!(rows[0].get("graduation_year"), Some("2018"));
        assert_eq!(rows[1].row_number, 2);
        assert_eq!(rows[1].get("degree_program"), Some("Animation"));
    }

    #[test]
    fn test_read_rows_trims_cell_values() {
        let csv = "name,graduation_year,degree_program\n  Sarah Chen  , 2018 , Film Production \n";
        let reader = CsvRosterReader;
        let rows = reader.read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].get("name"), Some("Sarah Chen"));
        assert_eq!(rows[0].get("graduation_year"), Some("2018"));
        assert_eq!(rows[0].get("degree_program"), Some("Film Production"));
    }

    #[test]
    fn test_read_rows_missing_required_column() {
        let csv = "name,degree_program\nSarah Chen,Film Production\n";
        let reader = CsvRosterReader;
        let err = reader.read_rows(csv.as_bytes()).unwrap_err();

        match err {
            ImportError::MissingRequiredColumns(cols) => {
                assert_eq!(cols, vec!["graduation_year".to_string()]);
            }
            other => panic!("Expected MissingRequiredColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_read_rows_header_match_is_case_sensitive() {
        // 表头 Name ≠ name,视为必填列缺失
        let csv = "Name,graduation_year,degree_program\nSarah Chen,2018,Film Production\n";
        let reader = CsvRosterReader;
        let err = reader.read_rows(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingRequiredColumns(_)));
    }

    #[test]
    fn test_read_rows_unknown_columns_ignored() {
        let csv = "name,graduation_year,degree_program,favorite_color\nSarah Chen,2018,Film Production,blue\n";
        let reader = CsvRosterReader;
        let rows = reader.read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("favorite_color"), None);
        assert_eq!(rows[0].get("name"), Some("Sarah Chen"));
    }

    #[test]
    fn test_read_rows_invalid_utf8() {
        let bytes: Vec<u8> = vec![0x6e, 0x61, 0x6d, 0x65, 0xff, 0xfe, 0x0a];
        let reader = CsvRosterReader;
        let err = reader.read_rows(&bytes).unwrap_err();
        assert!(matches!(err, ImportError::EncodingError(_)));
        assert!(err.is_structural());
    }

    #[test]
    fn test_read_rows_skips_blank_rows_but_keeps_ordinals() {
        let csv = "name,graduation_year,degree_program\nSarah Chen,2018,Film Production\n,,\nMarcus Webb,2019,Animation\n";
        let reader = CsvRosterReader;
        let rows = reader.read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 1);
        // 空白行占用第 2 行,后续行号不回收
        assert_eq!(rows[1].row_number, 3);
    }

    #[test]
    fn test_read_rows_header_only_file_yields_no_rows() {
        let csv = "name,graduation_year,degree_program\n";
        let reader = CsvRosterReader;
        let rows = reader.read_rows(csv.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_rows_short_row_missing_optional_cells() {
        let csv = "name,graduation_year,degree_program,email\nSarah Chen,2018,Film Production\n";
        let reader = CsvRosterReader;
        let rows = reader.read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("email"), None);
    }

    #[test]
    fn test_csv_template_round_trips_through_reader() {
        let reader = CsvRosterReader;
        let template = reader.csv_template();
        let rows = reader.read_rows(template.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("John Smith"));
        assert_eq!(rows[1].get("degree_program"), Some("Documentary"));
    }
}
