use serde::Serialize;

/// 各阶段报告数量
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct StageCounts {
    pub stage_0: i64,
    pub stage_1: i64,
    pub stage_2: i64,
    pub completed: i64,
}

/// 完成率统计
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CompletionStats {
    pub total_reports: i64,
    pub completed_reports: i64,
    pub completion_rate: f64,
    pub stage_counts: StageCounts,
}

/// 按班级统计
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassCompletion {
    pub class_name: String,
    pub stats: CompletionStats,
}

/// 按表单统计
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FormCompletion {
    pub form_id: i64,
    pub title: String,
    pub stats: CompletionStats,
}

/// 群组统计面板
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupStatisticsResponse {
    pub group_id: i64,
    pub overall: CompletionStats,
    pub by_class: Vec<ClassCompletion>,
    pub by_form: Vec<FormCompletion>,
}
