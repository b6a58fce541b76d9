// chat-scroll-view — Chat message rendering with coordinated scrolling
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Transcript file not found")]
    TranscriptNotFound,
    #[error("Transcript file could not be read")]
    TranscriptUnreadable,
    #[error("Transcript file is not a valid message list")]
    TranscriptInvalid,
}

impl AppError {
    pub const TRANSCRIPT_NOT_FOUND_EXIT_CODE: i32 = 20;
    pub const TRANSCRIPT_UNREADABLE_EXIT_CODE: i32 = 21;
    pub const TRANSCRIPT_INVALID_EXIT_CODE: i32 = 22;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TranscriptNotFound => Self::TRANSCRIPT_NOT_FOUND_EXIT_CODE,
            Self::TranscriptUnreadable => Self::TRANSCRIPT_UNREADABLE_EXIT_CODE,
            Self::TranscriptInvalid => Self::TRANSCRIPT_INVALID_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TranscriptNotFound => "Transcript file not found. Check the --transcript path.",
            Self::TranscriptUnreadable => "Transcript file exists but could not be read.",
            Self::TranscriptInvalid => {
                "Transcript is not valid JSON: expected a message array or {\"messages\": [...]}. \
See the log file for the failing field."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            AppError::TranscriptNotFound.exit_code(),
            AppError::TranscriptUnreadable.exit_code(),
            AppError::TranscriptInvalid.exit_code(),
        ];
        assert_eq!(codes, [20, 21, 22]);
    }
}
