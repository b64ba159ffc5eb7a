// ==========================================
// 校友名册导入系统 - 校友仓储 Trait
// ==========================================
// 职责: 定义校友记录数据访问接口（不含业务规则）
// 红线: Repository 不含业务逻辑,只做数据 CRUD
// ==========================================

use crate::domain::types::DuplicateKeyPolicy;
use crate::domain::AlumniRecord;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// AlumniRepository Trait - 批量写入器的存储面
// ==========================================
// 用途: 逐行独立落库（一行失败不阻塞/不回滚兄弟行）
// 实现者: AlumniRepositoryImpl（rusqlite）
#[async_trait]
pub trait AlumniRepository: Send + Sync {
    /// 插入单条校友记录并返回分配的 id
    ///
    /// # 返回
    /// - Ok(i64): 新记录 id
    /// - Err(RepositoryError::UniqueConstraintViolation): 姓名+毕业年份已存在
    ///   （并发竞态下的迟到重复,编排器重分类为重复拒绝）
    /// - Err: 其他数据库错误（行级持久化失败）
    async fn insert_alumnus(&self, record: &AlumniRecord) -> RepositoryResult<i64>;

    /// 按重复键查询记录是否已落库
    ///
    /// # 参数
    /// - name: 姓名（已 trim）
    /// - graduation_year: 毕业年份
    /// - policy: 重复键策略（大小写敏感性）
    async fn exists_by_key(
        &self,
        name: &str,
        graduation_year: i32,
        policy: DuplicateKeyPolicy,
    ) -> RepositoryResult<bool>;

    /// 按重复键查询单条记录
    async fn find_by_key(
        &self,
        name: &str,
        graduation_year: i32,
    ) -> RepositoryResult<Option<AlumniRecord>>;

    /// 统计 alumni 表记录数
    async fn count_alumni(&self) -> RepositoryResult<usize>;
}
