use serde::Deserialize;

// 科目创建请求
//
// code 由调用方先行大写归一化。
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

// 科目更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

// 科目列表查询参数（用于存储层）
//
// 默认只返回未删除的科目；`code` 为子串匹配。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectListQuery {
    pub code: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}
