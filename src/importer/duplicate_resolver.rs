// ==========================================
// 校友名册导入系统 - 重复解析器实现
// ==========================================
// 职责: 判定候选记录是否与已落库记录或同批次较早行重复（阶段 2）
// 契约: 纯判定,存储查询由编排器注入结果
// 两层防御: 本判定为第一层,存储层唯一约束为第二层（并发竞态兜底）
// ==========================================

use crate::domain::types::DuplicateKeyPolicy;
use std::collections::HashSet;

/// 重复键: (策略归一化后的姓名, 毕业年份)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub name: String,
    pub graduation_year: i32,
}

/// 重复判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateCheck {
    Unique,           // 可写入
    DuplicateInBatch, // 同批次较早行已接受同键
    DuplicateInStore, // 存储中已存在同键记录
}

// ==========================================
// DuplicateResolver - 重复解析器
// ==========================================
#[derive(Default)]
pub struct DuplicateResolver {
    policy: DuplicateKeyPolicy,
}

impl DuplicateResolver {
    pub fn new(policy: DuplicateKeyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DuplicateKeyPolicy {
        self.policy
    }

    /// 构造重复键（姓名已由读取器 trim;按策略归一化大小写）
    pub fn key(&self, name: &str, graduation_year: i32) -> DuplicateKey {
        let name = match self.policy {
            DuplicateKeyPolicy::CaseSensitive => name.to_string(),
            DuplicateKeyPolicy::CaseInsensitive => name.to_lowercase(),
        };
        DuplicateKey {
            name,
            graduation_year,
        }
    }

    /// 判定候选键
    ///
    /// # 参数
    /// - key: 候选记录的重复键
    /// - accepted_in_batch: 同批次较早行已接受的键集合
    /// - exists_in_store: 存储查询结果（同键记录是否已落库）
    ///
    /// # 优先级
    /// 存储重复优先于批内重复（与外部报表语义一致:“已存在”指向持久记录）
    pub fn check(
        &self,
        key: &DuplicateKey,
        accepted_in_batch: &HashSet<DuplicateKey>,
        exists_in_store: bool,
    ) -> DuplicateCheck {
        if exists_in_store {
            DuplicateCheck::DuplicateInStore
        } else if accepted_in_batch.contains(key) {
            DuplicateCheck::DuplicateInBatch
        } else {
            DuplicateCheck::Unique
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_when_unseen() {
        let resolver = DuplicateResolver::new(DuplicateKeyPolicy::CaseSensitive);
        let key = resolver.key("Sarah Chen", 2018);
        let seen = HashSet::new();

        assert_eq!(resolver.check(&key, &seen, false), DuplicateCheck::Unique);
    }

    #[test]
    fn test_duplicate_in_batch() {
        let resolver = DuplicateResolver::new(DuplicateKeyPolicy::CaseSensitive);
        let key = resolver.key("Sarah Chen", 2018);
        let mut seen = HashSet::new();
        seen.insert(resolver.key("Sarah Chen", 2018));

        assert_eq!(
            resolver.check(&key, &seen, false),
            DuplicateCheck::DuplicateInBatch
        );
    }

    #[test]
    fn test_duplicate_in_store_wins_over_batch() {
        let resolver = DuplicateResolver::new(DuplicateKeyPolicy::CaseSensitive);
        let key = resolver.key("Sarah Chen", 2018);
        let mut seen = HashSet::new();
        seen.insert(resolver.key("Sarah Chen", 2018));

        assert_eq!(
            resolver.check(&key, &seen, true),
            DuplicateCheck::DuplicateInStore
        );
    }

    #[test]
    fn test_same_name_different_year_is_unique() {
        let resolver = DuplicateResolver::new(DuplicateKeyPolicy::CaseSensitive);
        let mut seen = HashSet::new();
        seen.insert(resolver.key("Sarah Chen", 2018));

        let key = resolver.key("Sarah Chen", 2019);
        assert_eq!(resolver.check(&key, &seen, false), DuplicateCheck::Unique);
    }

    #[test]
    fn test_case_sensitive_policy_distinguishes_case() {
        let resolver = DuplicateResolver::new(DuplicateKeyPolicy::CaseSensitive);
        let mut seen = HashSet::new();
        seen.insert(resolver.key("Sarah Chen", 2018));

        let key = resolver.key("sarah chen", 2018);
        assert_eq!(resolver.check(&key, &seen, false), DuplicateCheck::Unique);
    }

    #[test]
    fn test_case_insensitive_policy_folds_case() {
        let resolver = DuplicateResolver::new(DuplicateKeyPolicy::CaseInsensitive);
        let mut seen = HashSet::new();
        seen.insert(resolver.key("Sarah Chen", 2018));

        let key = resolver.key("SARAH CHEN", 2018);
        assert_eq!(
            resolver.check(&key, &seen, false),
            DuplicateCheck::DuplicateInBatch
        );
    }
}
