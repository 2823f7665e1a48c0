//! User-visible message texts (zh-TW / en-US).

use serde::{Deserialize, Serialize};
use stork_inventory_backend::RecordKind;

use crate::engine::{LifecycleAction, ValidationError};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "en-US")]
    EnUs,
}

/// Backend-facing action whose failure is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Load,
    Search,
    Create,
    Update,
    Lifecycle(LifecycleAction),
    /// Lifecycle action over the selection.
    BulkLifecycle(LifecycleAction),
}

impl From<LifecycleAction> for Action {
    fn from(action: LifecycleAction) -> Self {
        Self::Lifecycle(action)
    }
}

impl Language {
    /// Parse `zh-TW` / `en-US` (case-insensitive, `_` accepted).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-tw" | "zh-hant" | "zh" => Some(Self::ZhTw),
            "en-us" | "en" => Some(Self::EnUs),
            _ => None,
        }
    }

    pub fn kind_label(self, kind: RecordKind) -> &'static str {
        match (self, kind) {
            (Self::ZhTw, RecordKind::Pc) => "電腦",
            (Self::ZhTw, RecordKind::Printer) => "印表機",
            (Self::ZhTw, RecordKind::Network) => "網路設備",
            (Self::EnUs, RecordKind::Pc) => "PC",
            (Self::EnUs, RecordKind::Printer) => "printer",
            (Self::EnUs, RecordKind::Network) => "network equipment",
        }
    }

    pub fn lifecycle_label(self, action: LifecycleAction) -> &'static str {
        match (self, action) {
            (Self::ZhTw, LifecycleAction::Hide) => "隱藏",
            (Self::ZhTw, LifecycleAction::Restore) => "還原",
            (Self::ZhTw, LifecycleAction::PermanentDelete) => "永久刪除",
            (Self::EnUs, LifecycleAction::Hide) => "hide",
            (Self::EnUs, LifecycleAction::Restore) => "restore",
            (Self::EnUs, LifecycleAction::PermanentDelete) => "permanently delete",
        }
    }

    /// `"<action label>: <backend message>"`.
    pub fn failure(self, kind: RecordKind, action: Action, message: &str) -> String {
        match (self, action) {
            (Self::ZhTw, Action::Load) => {
                format!("無法載入{}資料: {message}", self.kind_label(kind))
            }
            (Self::ZhTw, Action::Search) => format!("搜尋失敗: {message}"),
            (Self::ZhTw, Action::Create) => format!("新增失敗: {message}"),
            (Self::ZhTw, Action::Update) => format!("更新失敗: {message}"),
            (Self::ZhTw, Action::Lifecycle(a)) => {
                format!("{}失敗: {message}", self.lifecycle_label(a))
            }
            (Self::ZhTw, Action::BulkLifecycle(a)) => {
                format!("批次{}失敗: {message}", self.lifecycle_label(a))
            }
            (Self::EnUs, Action::Load) => {
                format!("Failed to load {} data: {message}", self.kind_label(kind))
            }
            (Self::EnUs, Action::Search) => format!("Search failed: {message}"),
            (Self::EnUs, Action::Create) => format!("Create failed: {message}"),
            (Self::EnUs, Action::Update) => format!("Update failed: {message}"),
            (Self::EnUs, Action::Lifecycle(a)) => {
                format!("Failed to {}: {message}", self.lifecycle_label(a))
            }
            (Self::EnUs, Action::BulkLifecycle(a)) => {
                format!("Failed to {} selected records: {message}", self.lifecycle_label(a))
            }
        }
    }

    /// Prompt shown in the confirmation dialog (and on mismatch).
    pub fn confirm_prompt(self, action: LifecycleAction) -> String {
        match self {
            Self::ZhTw => format!(
                "請輸入 \"{}\" 以確認{}",
                action.phrase(),
                self.lifecycle_label(action)
            ),
            Self::EnUs => format!(
                "Type \"{}\" to {}",
                action.phrase(),
                self.lifecycle_label(action)
            ),
        }
    }

    fn identity_fields_label(self, kind: RecordKind) -> &'static str {
        match (self, kind) {
            (Self::ZhTw, RecordKind::Pc) => "電腦名稱/IP/財編/UUID",
            (Self::ZhTw, RecordKind::Printer) => "廠牌/型號/IP/財編",
            (Self::ZhTw, RecordKind::Network) => "廠牌/型號/IP/財編/位置",
            (Self::EnUs, RecordKind::Pc) => "computer name/IP/asset ID/UUID",
            (Self::EnUs, RecordKind::Printer) => "brand/model/IP/asset ID",
            (Self::EnUs, RecordKind::Network) => "brand/model/IP/asset ID/location",
        }
    }

    pub fn validation(self, err: &ValidationError) -> String {
        match (self, err) {
            (Self::ZhTw, ValidationError::MissingField { field }) => {
                format!("請填寫必填欄位: {field}")
            }
            (Self::ZhTw, ValidationError::InvalidIp { .. }) => {
                "IP 格式錯誤 (範例: 192.168.1.1)".to_string()
            }
            (Self::ZhTw, ValidationError::DuplicateIp { conflicting_name, .. }) => {
                if conflicting_name.is_empty() {
                    "IP 地址已存在於系統中".to_string()
                } else {
                    format!("IP 地址已存在於系統中 (與 「{conflicting_name}」 衝突)")
                }
            }
            (Self::ZhTw, ValidationError::DuplicateRecord { kind, .. }) => format!(
                "系統中已存在完全相同的詳細資料 ({})",
                self.identity_fields_label(*kind)
            ),
            (Self::EnUs, ValidationError::MissingField { field }) => {
                format!("Required field is empty: {field}")
            }
            (Self::EnUs, ValidationError::InvalidIp { .. }) => {
                "Invalid IP format (e.g. 192.168.1.1)".to_string()
            }
            (Self::EnUs, ValidationError::DuplicateIp { conflicting_name, .. }) => {
                if conflicting_name.is_empty() {
                    "IP address already exists in the system".to_string()
                } else {
                    format!(
                        "IP address already exists in the system (conflicts with \"{conflicting_name}\")"
                    )
                }
            }
            (Self::EnUs, ValidationError::DuplicateRecord { kind, .. }) => format!(
                "An identical record already exists ({})",
                self.identity_fields_label(*kind)
            ),
        }
    }

    /// Localized text for any non-backend core error. Backend errors are
    /// reported through [`failure`](Self::failure) with their action label.
    pub fn error(self, err: &CoreError) -> String {
        match (self, err) {
            (_, CoreError::Validation(v)) => self.validation(v),
            (_, CoreError::ConfirmationMismatch { expected }) => match self {
                Self::ZhTw => format!("請輸入 \"{expected}\" 以確認"),
                Self::EnUs => format!("Type \"{expected}\" to confirm"),
            },
            (Self::ZhTw, CoreError::InvalidTransition { action, .. }) => {
                format!("此記錄目前的狀態無法{}", self.lifecycle_label(*action))
            }
            (Self::EnUs, CoreError::InvalidTransition { action, .. }) => format!(
                "This record cannot {} in its current state",
                match action {
                    LifecycleAction::Hide => "be hidden",
                    LifecycleAction::Restore => "be restored",
                    LifecycleAction::PermanentDelete => "be permanently deleted",
                }
            ),
            (Self::ZhTw, CoreError::RecordNotFound(id)) => format!("找不到記錄 #{id}"),
            (Self::EnUs, CoreError::RecordNotFound(id)) => format!("Record #{id} not found"),
            (Self::ZhTw, CoreError::NoSelection) => "請先勾選要處理的項目".to_string(),
            (Self::EnUs, CoreError::NoSelection) => "Select at least one record first".to_string(),
            (Self::ZhTw, CoreError::Export(m)) => format!("匯出失敗: {m}"),
            (Self::EnUs, CoreError::Export(m)) => format!("Export failed: {m}"),
            (_, other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_traditional_chinese() {
        assert_eq!(Language::default(), Language::ZhTw);
        assert_eq!(Language::from_tag("en_US"), Some(Language::EnUs));
        assert_eq!(Language::from_tag("fr"), None);
    }

    #[test]
    fn failure_prefixes() {
        let zh = Language::ZhTw;
        assert_eq!(
            zh.failure(RecordKind::Printer, Action::Load, "timeout"),
            "無法載入印表機資料: timeout"
        );
        assert_eq!(zh.failure(RecordKind::Pc, Action::Create, "x"), "新增失敗: x");
        assert_eq!(
            zh.failure(RecordKind::Pc, LifecycleAction::PermanentDelete.into(), "x"),
            "永久刪除失敗: x"
        );
        assert_eq!(
            Language::EnUs.failure(RecordKind::Network, Action::Lifecycle(LifecycleAction::Hide), "x"),
            "Failed to hide: x"
        );
        assert_eq!(
            zh.failure(RecordKind::Printer, Action::BulkLifecycle(LifecycleAction::Restore), "x"),
            "批次還原失敗: x"
        );
        assert_eq!(
            zh.failure(RecordKind::Pc, Action::BulkLifecycle(LifecycleAction::PermanentDelete), "x"),
            "批次永久刪除失敗: x"
        );
    }

    #[test]
    fn confirm_prompt_names_phrase() {
        assert_eq!(
            Language::ZhTw.confirm_prompt(LifecycleAction::Restore),
            "請輸入 \"RESTORE\" 以確認還原"
        );
    }

    #[test]
    fn duplicate_ip_message_mentions_ip() {
        let err = ValidationError::DuplicateIp {
            ip: "10.0.0.5".into(),
            conflicting_id: 1,
            conflicting_name: "HP M404".into(),
        };
        for lang in [Language::ZhTw, Language::EnUs] {
            assert!(lang.validation(&err).contains("IP"));
            assert!(lang.validation(&err).contains("HP M404"));
        }
    }

    #[test]
    fn exact_duplicate_names_identity_fields() {
        let err = ValidationError::DuplicateRecord {
            kind: RecordKind::Printer,
            conflicting_id: 2,
        };
        assert_eq!(
            Language::ZhTw.validation(&err),
            "系統中已存在完全相同的詳細資料 (廠牌/型號/IP/財編)"
        );
    }
}
