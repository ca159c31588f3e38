//! Detects uploads that are a different export than the extended
//! streaming history.

/// Files that only appear in the "technical log information" export.
const TECHNICAL_LOG_MARKERS: &[&str] = &[
    "MyData/share.json",
    "MyData/AddedToCollection.json",
    "MyData/Download_Hourly.json",
];

/// Files that only appear in the "account data" export.
const ACCOUNT_DATA_MARKERS: &[&str] = &["MyData/YourLibrary.json", "MyData/Userdata.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    StreamingHistory,
    TechnicalLog,
    AccountData,
}

impl ArchiveKind {
    /// Classify an archive from the JSON file names it contains.
    pub fn classify<S: AsRef<str>>(filenames: &[S]) -> Self {
        let contains_any = |markers: &[&str]| {
            filenames
                .iter()
                .any(|name| markers.contains(&name.as_ref()))
        };

        if contains_any(TECHNICAL_LOG_MARKERS) {
            ArchiveKind::TechnicalLog
        } else if contains_any(ACCOUNT_DATA_MARKERS) {
            ArchiveKind::AccountData
        } else {
            ArchiveKind::StreamingHistory
        }
    }

    pub fn is_streaming_history(self) -> bool {
        self == ArchiveKind::StreamingHistory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_history_passes() {
        let files = [
            "MyData/Streaming_History_Audio_2019-2021_0.json",
            "MyData/Streaming_History_Audio_2021-2023_1.json",
        ];
        assert_eq!(ArchiveKind::classify(&files), ArchiveKind::StreamingHistory);
    }

    #[test]
    fn technical_log_is_detected() {
        let files = vec!["MyData/Download_Hourly.json".to_string()];
        assert_eq!(ArchiveKind::classify(&files), ArchiveKind::TechnicalLog);
    }

    #[test]
    fn account_data_is_detected() {
        let files = ["MyData/Userdata.json", "MyData/Playlist1.json"];
        let kind = ArchiveKind::classify(&files);
        assert_eq!(kind, ArchiveKind::AccountData);
        assert!(!kind.is_streaming_history());
    }
}
