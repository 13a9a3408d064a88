//! Error-code to message registry for translated, user-facing error reports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{error::Error, placeholder::arg_all, translator::Translator};

/// Context the registry translates its templates in.
pub const REGISTRY_CONTEXT: &str = "QObject";

pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub module_code: i64,
    pub error_code: i64,
    /// Message template with `%1`.. markers.
    pub message: String,
    /// Whether the message may be shown to end users as-is.
    pub user_friendly: bool,
}

impl ErrorInfo {
    pub fn new(module_code: i64, error_code: i64, message: impl Into<String>, user_friendly: bool) -> Self {
        Self {
            module_code,
            error_code,
            message: message.into(),
            user_friendly,
        }
    }

    fn unknown(message: String) -> Self {
        Self::new(0, 0, message, true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ErrorMessagesRegistry {
    infos: HashMap<i64, ErrorInfo>,
}

impl ErrorMessagesRegistry {
    /// Builds the registry; every `error_code` must be unique.
    pub fn new<I: IntoIterator<Item = ErrorInfo>>(infos: I) -> Result<Self, Error> {
        let mut map = HashMap::new();
        for info in infos {
            let code = info.error_code;
            if map.insert(code, info).is_some() {
                return Err(Error::DuplicateErrorCode(code));
            }
        }
        Ok(Self { infos: map })
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Untranslated info with `args` substituted into the template.
    pub fn info_for_code<S: AsRef<str>>(&self, code: i64, args: &[S]) -> ErrorInfo {
        match self.infos.get(&code) {
            Some(info) => ErrorInfo {
                message: arg_all(&info.message, args),
                ..info.clone()
            },
            None => ErrorInfo::unknown(UNKNOWN_ERROR.to_string()),
        }
    }

    /// Like [`ErrorMessagesRegistry::info_for_code`], translating the template
    /// before the arguments go in.
    pub fn translated_info_for_code<S: AsRef<str>>(
        &self,
        code: i64,
        args: &[S],
        translator: &Translator,
    ) -> ErrorInfo {
        match self.infos.get(&code) {
            Some(info) => ErrorInfo {
                message: translator.tr_args(REGISTRY_CONTEXT, &info.message, args),
                ..info.clone()
            },
            None => ErrorInfo::unknown(translator.tr(REGISTRY_CONTEXT, UNKNOWN_ERROR).into_owned()),
        }
    }
}
