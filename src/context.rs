//! Hand-off to the question-answering service.
//!
//! The service receives a flat JSON view of a described dataset (name,
//! shape, columns, summary, and the preview rows) and a prompt built around
//! the user's question. Sending the request and interpreting the free-text
//! reply belong to the caller.

use itertools::Itertools;
use serde::Serialize;

use crate::{
    normalize::RowsView,
    pipeline::DatasetDescriptor,
    summary::DatasetSummary,
};

pub const SYSTEM_INSTRUCTION: &str = "You are a data analysis expert assistant. Provide clear, concise answers with specific numbers and insights from the data.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionContext<'a> {
    pub file_name: &'a str,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: &'a [String],
    pub summary: &'a DatasetSummary,
    pub sample_data: RowsView<'a>,
}

impl<'a> QuestionContext<'a> {
    pub fn new(descriptor: &'a DatasetDescriptor) -> Self {
        Self {
            file_name: descriptor.name(),
            row_count: descriptor.row_count(),
            column_count: descriptor.column_count(),
            columns: descriptor.columns(),
            summary: descriptor.summary(),
            sample_data: descriptor.dataset().rows_view(descriptor.preview()),
        }
    }

    pub fn build_prompt(&self, question: &str) -> serde_json::Result<String> {
        let sample = serde_json::to_string_pretty(&self.sample_data)?;
        let summary = serde_json::to_string_pretty(self.summary)?;
        Ok(format!(
            "You are a data analysis expert. Analyze this dataset:\n\n\
             File: {file}\n\
             Rows: {rows}\n\
             Columns: {columns}\n\n\
             Sample Data:\n{sample}\n\n\
             Statistical Summary:\n{summary}\n\n\
             User Question: {question}\n\n\
             Provide a detailed, accurate answer based on the data provided. \
             Include specific numbers and insights where relevant.",
            file = self.file_name,
            rows = self.row_count,
            columns = self.columns.iter().join(", "),
        ))
    }

    /// System and user messages for a chat-completion request.
    pub fn messages(&self, question: &str) -> serde_json::Result<Vec<ChatMessage>> {
        Ok(vec![
            ChatMessage {
                role: Role::System,
                content: SYSTEM_INSTRUCTION.to_string(),
            },
            ChatMessage {
                role: Role::User,
                content: self.build_prompt(question)?,
            },
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}
