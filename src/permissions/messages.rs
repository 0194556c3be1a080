use super::actions::Action;

/// 将动作转换为面向用户的提示，不包含任何资源 ID
pub fn permission_error_message(action: Action) -> String {
    let phrase = match action.verb() {
        "view" => "view",
        "create" => "create",
        "update" => "edit",
        "delete" => "delete",
        "send" => "send",
        "duplicate" => "duplicate",
        "respond" => "respond to",
        "invite" => "invite members to",
        "update_role" => "change member roles in",
        "remove" => "remove members from",
        "assign" => "assign",
        "update_stage1" => "review the first stage of",
        "update_stage2" => "review the second stage of",
        "reject" => "reject",
        "reopen" => "reopen",
        _ => "access",
    };

    let resource = match action.resource() {
        "member" => "this group",
        "statistics" => "statistics for this group",
        "group" => "this group",
        "class" => "this class",
        "student" => "this student",
        "form" => "this form",
        "question" => "questions of this form",
        "template" => "concept templates",
        "supervision" => "reviewers",
        "report" => "this report",
        _ => "this resource",
    };

    format!("You do not have permission to {phrase} {resource}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_describe_the_verb() {
        assert_eq!(
            permission_error_message(Action::SendForm),
            "You do not have permission to send this form"
        );
        assert_eq!(
            permission_error_message(Action::UpdateReportStage1),
            "You do not have permission to review the first stage of this report"
        );
        assert_eq!(
            permission_error_message(Action::InviteMember),
            "You do not have permission to invite members to this group"
        );
    }

    #[test]
    fn test_every_action_has_a_message_without_ids() {
        for action in Action::ALL {
            let message = permission_error_message(*action);
            assert!(message.starts_with("You do not have permission to "));
            assert!(!message.chars().any(|c| c.is_ascii_digit()));
        }
    }
}
