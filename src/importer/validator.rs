// ==========================================
// 校友名册导入系统 - 行校验器实现
// ==========================================
// 职责: 单行原始值 → 规范化记录 或 有序违规列表（阶段 1）
// 契约: 纯函数,无 I/O;畸形输入是预期输出形态,永不 panic
// 规则顺序固定: name → graduation_year → degree_program → email → URL 字段
// ==========================================

use crate::domain::{AlumniRecord, DegreeProgram, RawAlumniRow, RowViolation};

/// 姓名长度上限（字符数）
const NAME_MAX_LEN: usize = 100;

/// 毕业年份下限（含）
const GRADUATION_YEAR_MIN: i32 = 1970;

/// 毕业年份上限（含）
const GRADUATION_YEAR_MAX: i32 = 2030;

/// URL 字段（固定校验顺序）
const URL_FIELDS: [&str; 3] = ["linkedin_url", "imdb_url", "website"];

// ==========================================
// RosterValidator - 名册行校验器
// ==========================================
pub struct RosterValidator;

impl RosterValidator {
    /// 校验单行并收集全部适用违规
    ///
    /// # 返回
    /// - Ok(AlumniRecord): 零违规,规范化后的候选记录
    /// - Err(Vec<RowViolation>): 非空有序违规列表（同一行内按规则顺序）
    pub fn validate(&self, row: &RawAlumniRow) -> Result<AlumniRecord, Vec<RowViolation>> {
        let mut violations = Vec::new();

        // 规则 1: 姓名必填,非空,长度 ≤ 100
        let name = match row.get("name") {
            Some(v) if v.chars().count() > NAME_MAX_LEN => {
                violations.push(RowViolation::new(
                    "name",
                    format!("Name too long (max {} characters)", NAME_MAX_LEN),
                ));
                None
            }
            Some(v) => Some(v.to_string()),
            None => {
                violations.push(RowViolation::new("name", "Name is required"));
                None
            }
        };

        // 规则 2: 毕业年份必填,整数,区间 [1970, 2030]
        let graduation_year = match row.get("graduation_year") {
            Some(v) => match v.parse::<i32>() {
                Ok(year) if (GRADUATION_YEAR_MIN..=GRADUATION_YEAR_MAX).contains(&year) => {
                    Some(year)
                }
                Ok(_) => {
                    violations.push(RowViolation::new(
                        "graduation_year",
                        format!(
                            "Graduation year must be between {} and {}",
                            GRADUATION_YEAR_MIN, GRADUATION_YEAR_MAX
                        ),
                    ));
                    None
                }
                Err(_) => {
                    violations.push(RowViolation::new(
                        "graduation_year",
                        "Invalid graduation year",
                    ));
                    None
                }
            },
            None => {
                violations.push(RowViolation::new(
                    "graduation_year",
                    "Graduation year is required",
                ));
                None
            }
        };

        // 规则 3: 学位项目必填,大小写敏感的封闭集合
        let degree_program = match row.get("degree_program") {
            Some(v) => match DegreeProgram::parse(v) {
                Some(program) => Some(program),
                None => {
                    violations.push(RowViolation::new(
                        "degree_program",
                        format!(
                            "Invalid degree program. Must be one of: {}",
                            DegreeProgram::valid_values()
                        ),
                    ));
                    None
                }
            },
            None => {
                violations.push(RowViolation::new(
                    "degree_program",
                    "Degree program is required",
                ));
                None
            }
        };

        // 规则 4: 邮箱（可选）- 恰好一个 @,local/domain 非空,domain 含 '.'
        let email = match row.get("email") {
            Some(v) => {
                if is_valid_email(v) {
                    Some(v.to_string())
                } else {
                    violations.push(RowViolation::new("email", "Invalid email format"));
                    None
                }
            }
            None => None,
        };

        // 规则 5: URL 字段（可选）- 必须以 http:// 或 https:// 开头
        let mut urls: [Option<String>; 3] = [None, None, None];
        for (slot, field) in URL_FIELDS.iter().enumerate() {
            if let Some(v) = row.get(field) {
                if v.starts_with("http://") || v.starts_with("https://") {
                    urls[slot] = Some(v.to_string());
                } else {
                    violations.push(RowViolation::new(
                        field,
                        format!("{} must start with http:// or https://", field),
                    ));
                }
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        // 零违规时三个必填字段必然已解析
        let [linkedin_url, imdb_url, website] = urls;
        match (name, graduation_year, degree_program) {
            (Some(name), Some(graduation_year), Some(degree_program)) => Ok(AlumniRecord {
                name,
                graduation_year,
                degree_program,
                email,
                linkedin_url,
                imdb_url,
                website,
            }),
            _ => Err(vec![RowViolation::new(
                "row",
                "Row could not be normalized",
            )]),
        }
    }
}

/// 邮箱形态校验: 恰好一个 @,local 与 domain 非空,domain 含 '.'
fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.')
        }
        _ => false,
    }
}
