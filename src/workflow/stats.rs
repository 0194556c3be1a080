use std::collections::BTreeMap;

use crate::models::forms::entities::Form;
use crate::models::reports::entities::{Report, ReportStage};
use crate::models::statistics::responses::{
    ClassCompletion, CompletionStats, FormCompletion, GroupStatisticsResponse, StageCounts,
};

pub const UNASSIGNED_CLASS: &str = "Unassigned";

/// 完成率（百分比，保留两位小数），总数为 0 时返回 0
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

pub fn completion_stats<'a>(reports: impl IntoIterator<Item = &'a Report>) -> CompletionStats {
    let mut counts = StageCounts::default();
    for report in reports {
        match report.stage {
            ReportStage::AwaitingStudent => counts.stage_0 += 1,
            ReportStage::AwaitingPartTime => counts.stage_1 += 1,
            ReportStage::AwaitingTeacher => counts.stage_2 += 1,
            ReportStage::Completed => counts.completed += 1,
        }
    }

    let total = counts.stage_0 + counts.stage_1 + counts.stage_2 + counts.completed;
    CompletionStats {
        total_reports: total,
        completed_reports: counts.completed,
        completion_rate: completion_rate(counts.completed, total),
        stage_counts: counts,
    }
}

/// 群组统计：整体、按班级（按名称排序）、按表单（保持表单顺序）
pub fn group_statistics(
    group_id: i64,
    reports: &[Report],
    forms: &[Form],
) -> GroupStatisticsResponse {
    let mut by_class: BTreeMap<&str, Vec<&Report>> = BTreeMap::new();
    for report in reports {
        let class = report.class_name.as_deref().unwrap_or(UNASSIGNED_CLASS);
        by_class.entry(class).or_default().push(report);
    }

    GroupStatisticsResponse {
        group_id,
        overall: completion_stats(reports),
        by_class: by_class
            .into_iter()
            .map(|(class_name, reports)| ClassCompletion {
                class_name: class_name.to_string(),
                stats: completion_stats(reports),
            })
            .collect(),
        by_form: forms
            .iter()
            .map(|form| FormCompletion {
                form_id: form.id,
                title: form.title.clone(),
                stats: completion_stats(reports.iter().filter(|r| r.form_id == form.id)),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::entities::FormStatus;

    fn report(id: i64, form_id: i64, class: Option<&str>, stage: ReportStage) -> Report {
        let now = chrono::Utc::now();
        Report {
            id,
            group_id: 1,
            form_id,
            form_response_id: None,
            responder_id: None,
            student_name: None,
            class_name: class.map(str::to_string),
            stage,
            supervision_id: None,
            time_teacher_id: None,
            teacher_id: None,
            time_teacher_comment: None,
            teacher_comment: None,
            time_teacher_completed_at: None,
            teacher_completed_at: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn form(id: i64, title: &str) -> Form {
        let now = chrono::Utc::now();
        Form {
            id,
            group_id: 1,
            creator_id: 1,
            title: title.into(),
            description: None,
            status: FormStatus::Send,
            supervision_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_completion_rate_handles_empty_total() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert!(!completion_rate(0, 0).is_nan());
        assert_eq!(completion_rate(1, 3), 33.33);
        assert_eq!(completion_rate(2, 3), 66.67);
        assert_eq!(completion_rate(4, 4), 100.0);
    }

    #[test]
    fn test_group_statistics_breakdown() {
        let reports = vec![
            report(1, 10, Some("B"), ReportStage::Completed),
            report(2, 10, Some("A"), ReportStage::AwaitingTeacher),
            report(3, 11, Some("A"), ReportStage::Completed),
            report(4, 11, None, ReportStage::AwaitingStudent),
        ];
        let forms = vec![form(10, "Week 1"), form(11, "Week 2"), form(12, "Week 3")];

        let stats = group_statistics(1, &reports, &forms);
        assert_eq!(stats.overall.total_reports, 4);
        assert_eq!(stats.overall.completed_reports, 2);
        assert_eq!(stats.overall.completion_rate, 50.0);
        assert_eq!(stats.overall.stage_counts.stage_2, 1);

        let classes: Vec<_> = stats.by_class.iter().map(|c| c.class_name.as_str()).collect();
        assert_eq!(classes, vec!["A", "B", UNASSIGNED_CLASS]);
        assert_eq!(stats.by_class[0].stats.completion_rate, 50.0);

        assert_eq!(stats.by_form.len(), 3);
        assert_eq!(stats.by_form[2].stats, CompletionStats::default());
    }
}
