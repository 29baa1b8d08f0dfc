//! End-to-end pipeline
//!
//! [`Scribe`] owns the configuration and a compiled pattern library and runs
//! transcripts through extraction, reduction, ticket mapping and document
//! assembly. The pattern library is read-only after construction, so one
//! `Scribe` serves any number of transcripts, in parallel if needed.

use crate::batch::TicketBatch;
use crate::checkpoint::ReviewSession;
use crate::config::ScribeConfig;
use crate::document::StructuredDocument;
use crate::error::ScribeError;
use crate::extract::extract;
use crate::mapping::map_epic;
use crate::reduce::{cluster, reduce, Clarifications};
use crate::types::Transcript;
use rayon::prelude::*;
use scribe_patterns::PatternLibrary;

/// Longest excerpt quoted in the no-content clarification
const EXCERPT_CHARS: usize = 80;

/// Transcript to structured document pipeline
#[derive(Debug)]
pub struct Scribe {
    config: ScribeConfig,
    library: PatternLibrary,
}

impl Scribe {
    /// Create pipeline with the stock pattern library
    pub fn new(config: ScribeConfig) -> Result<Self, ScribeError> {
        Ok(Self::with_library(config, PatternLibrary::with_defaults()?))
    }

    /// Create pipeline with a custom pattern library
    #[must_use]
    pub fn with_library(config: ScribeConfig, library: PatternLibrary) -> Self {
        Self { config, library }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScribeConfig {
        &self.config
    }

    /// Pattern library
    #[inline]
    #[must_use]
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Run one transcript through the pipeline
    ///
    /// Never fails: a transcript without requirement content yields zero
    /// epics and a single clarification saying so.
    #[must_use]
    pub fn process(&self, transcript: &Transcript) -> StructuredDocument {
        let source = transcript.source().unwrap_or("<inline>");
        let extraction = extract(&self.library, transcript.text(), transcript.metadata());
        let mut clar = Clarifications::new();

        if !extraction.has_content() {
            tracing::warn!(source, "no requirement content found");
            clar.raise(
                "No requirement content was found in the transcript; is this the right file?",
                excerpt(transcript.text()),
            );
            return StructuredDocument::build(
                extraction.metadata,
                Vec::new(),
                extraction.action_items,
                clar.into_vec(),
            );
        }

        let clusters = cluster(&extraction, &mut clar);
        let mut epics = Vec::with_capacity(clusters.len());
        for c in &clusters {
            let requirements = reduce(c, &self.config, &mut clar);
            epics.push(map_epic(&requirements, &self.config, &mut clar));
        }

        if epics.len() > self.config.epic_count_threshold {
            let names: Vec<&str> = epics.iter().map(|e| e.epic_name.as_str()).collect();
            clar.raise(
                format!(
                    "Found {} epics, more than the expected {}; should some of them be merged?",
                    epics.len(),
                    self.config.epic_count_threshold
                ),
                names.join(", "),
            );
        }

        let doc = StructuredDocument::build(
            extraction.metadata,
            epics,
            extraction.action_items,
            clar.into_vec(),
        );
        tracing::info!(
            source,
            epics = doc.epics.len(),
            tickets = doc.ticket_count(),
            clarifications = doc.clarifications_needed.len(),
            "transcript processed"
        );
        doc
    }

    /// Run one raw text through the pipeline
    #[must_use]
    pub fn process_text(&self, text: &str) -> StructuredDocument {
        self.process(&Transcript::new(text))
    }

    /// Run several transcripts in parallel, results in input order
    #[must_use]
    pub fn process_many(&self, transcripts: &[Transcript]) -> Vec<StructuredDocument> {
        transcripts.par_iter().map(|t| self.process(t)).collect()
    }

    /// Open a review session for a document
    #[must_use]
    pub fn review(&self, document: StructuredDocument) -> ReviewSession {
        ReviewSession::new(document)
    }

    /// Re-ingest a hand-edited document and resume at ticket mapping
    ///
    /// Tickets whose summary or description were cleared are rendered again.
    pub fn resume(&self, json: &str) -> Result<StructuredDocument, ScribeError> {
        let mut doc = StructuredDocument::from_json(json).map_err(|e| {
            tracing::warn!(path = e.path(), error = %e, "edited document rejected");
            e
        })?;
        let filled = doc.fill_missing_text(&self.config);
        tracing::info!(
            epics = doc.epics.len(),
            tickets = doc.ticket_count(),
            filled,
            "edited document accepted"
        );
        Ok(doc)
    }

    /// Ticket batch for an approved document
    #[must_use]
    pub fn batch(&self, document: &StructuredDocument, transcript: &Transcript) -> TicketBatch {
        TicketBatch::from_document(
            document,
            transcript.source().unwrap_or("<inline>"),
            transcript.text(),
            &self.config,
        )
    }
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(empty transcript)".to_string();
    }
    let mut excerpt: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    if trimmed.chars().count() > EXCERPT_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeetingMetadata;

    fn scribe() -> Scribe {
        Scribe::new(ScribeConfig::default()).unwrap()
    }

    #[test]
    fn empty_transcript_yields_one_clarification() {
        let doc = scribe().process_text("");
        assert!(doc.epics.is_empty());
        assert_eq!(doc.clarifications_needed.len(), 1);
        assert_eq!(doc.clarifications_needed[0].context, "(empty transcript)");
    }

    #[test]
    fn priority_only_transcript_has_no_epics() {
        let doc = scribe().process_text("Sarah: This is urgent!");
        assert!(doc.epics.is_empty());
        assert_eq!(doc.clarifications_needed.len(), 1);
        assert_eq!(doc.meeting_metadata.attendees, vec!["Sarah"]);
    }

    #[test]
    fn too_many_epics_raise_a_question() {
        let doc = scribe().process_text(
            "Epic: Wound Care. Tabs: Open, Closed. Epic: Lab Orders. Tabs: Pending. Epic: Vitals. Tabs: Today",
        );
        assert_eq!(doc.epics.len(), 3);
        assert!(doc
            .clarifications_needed
            .iter()
            .any(|c| c.question.starts_with("Found 3 epics")));
    }

    #[test]
    fn explicit_metadata_is_kept() {
        let transcript = Transcript::new("Epic: Wound Care. Tabs: Open")
            .with_metadata(MeetingMetadata::default().with_date("2024-03-05"));
        let doc = scribe().process(&transcript);
        assert_eq!(doc.meeting_metadata.date, "2024-03-05");
    }

    #[test]
    fn resume_rejects_invalid_documents() {
        let err = scribe().resume("{}").unwrap_err();
        assert!(err.requires_human());
    }

    #[test]
    fn long_excerpts_are_cut() {
        let text = "x".repeat(200);
        let cut = excerpt(&text);
        assert_eq!(cut.chars().count(), EXCERPT_CHARS + 3);
    }
}
