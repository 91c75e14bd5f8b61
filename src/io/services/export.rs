//! Board view export service.
//!
//! Orchestrates column selection, row generation and encoding, then hands the
//! artifact to a sink.

use crate::config::ExportSettings;
use crate::io::codec::CodecRegistry;
use crate::io::formats::ExportArtifact;
use crate::io::formatting::Formatter;
use crate::io::rows::RowGenerator;
use crate::io::traits::ArtifactSink;
use crate::models::{Board, Record, ViewDefinition};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

/// Options for export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// File name stem used when the view title is blank.
    pub fallback_title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            fallback_title: "Untitled".to_string(),
        }
    }
}

impl ExportOptions {
    /// Creates options from the export settings.
    #[must_use]
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            fallback_title: settings.fallback_title.clone(),
        }
    }

    /// Sets the fallback file name stem.
    #[must_use]
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        self.fallback_title = title.into();
        self
    }
}

/// Result of an export delivered to a sink.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Number of records exported.
    pub exported: usize,
    /// Where the sink stored the file.
    pub output_path: PathBuf,
    /// The delivered artifact.
    pub artifact: ExportArtifact,
}

/// Picks the view to export: an explicit view wins over the active one.
#[must_use]
pub fn resolve_view<'a>(
    active: Option<&'a ViewDefinition>,
    explicit: Option<&'a ViewDefinition>,
) -> Option<&'a ViewDefinition> {
    explicit.or(active)
}

/// Service for exporting a board view to CSV.
pub struct ExportService {
    registry: CodecRegistry,
    formatter: Arc<dyn Formatter>,
    options: ExportOptions,
}

impl ExportService {
    /// Creates an export service with the standard codecs.
    #[must_use]
    pub fn new(formatter: Arc<dyn Formatter>) -> Self {
        Self {
            registry: CodecRegistry::standard(),
            formatter,
            options: ExportOptions::default(),
        }
    }

    /// Replaces the codec registry.
    #[must_use]
    pub fn with_registry(mut self, registry: CodecRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the export options.
    #[must_use]
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the artifact for a view.
    ///
    /// Returns `Ok(None)` when there is no view to export. Records are
    /// exported in the order given.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be written.
    pub fn build(
        &self,
        board: &Board,
        view: Option<&ViewDefinition>,
        records: &[Record],
    ) -> Result<Option<ExportArtifact>> {
        let Some(view) = view else {
            return Ok(None);
        };
        let generator = RowGenerator::new(&self.registry, self.formatter.as_ref());
        let rows = generator.generate(board, view, records);
        ExportArtifact::from_rows(&view.title, &rows, &self.options.fallback_title).map(Some)
    }

    /// Builds the artifact and stores it through `sink`.
    ///
    /// Returns `Ok(None)` when there is no view to export.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be written or the sink fails to
    /// store the artifact.
    #[instrument(
        skip(self, board, view, records, sink),
        fields(board_id = %board.id, records = records.len())
    )]
    pub async fn export_to_sink<S: ArtifactSink>(
        &self,
        board: &Board,
        view: Option<&ViewDefinition>,
        records: &[Record],
        sink: &S,
    ) -> Result<Option<ExportResult>> {
        let Some(artifact) = self.build(board, view, records)? else {
            tracing::debug!("No view selected, nothing to export");
            return Ok(None);
        };

        let output_path = sink.save(&artifact).await?;
        tracing::info!(
            path = %output_path.display(),
            rows = artifact.row_count,
            "Exported view to CSV"
        );

        Ok(Some(ExportResult {
            exported: artifact.row_count,
            output_path,
            artifact,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::formatting::DefaultFormatter;
    use crate::io::traits::DirectorySink;
    use crate::models::{PropertyTemplate, ViewKind};
    use tempfile::TempDir;

    fn service() -> ExportService {
        ExportService::new(Arc::new(DefaultFormatter::new()))
    }

    fn board() -> Board {
        Board::new("b1", "Sprint").with_property(PropertyTemplate::new("p1", "Status", "text"))
    }

    fn view() -> ViewDefinition {
        ViewDefinition::new("v1", "b1", "Sprint #3", ViewKind::Table).with_visible(["p1"])
    }

    #[test]
    fn test_build_without_view_is_none() {
        assert!(service().build(&board(), None, &[]).unwrap().is_none());
    }

    #[test]
    fn test_build_artifact() {
        let records = vec![Record::for_board("b1", "Fix #12").with_property("p1", "Open")];
        let artifact = service()
            .build(&board(), Some(&view()), &records)
            .unwrap()
            .unwrap();
        assert_eq!(artifact.filename, "Sprint #3.csv");
        assert_eq!(artifact.contents, "Name,Status\r\n\"Fix #12\",Open\r\n");
        assert!(artifact.data_uri.contains("%22Fix%20%2312%22"));
        assert_eq!(artifact.row_count, 1);
    }

    #[test]
    fn test_fallback_title_for_blank_view() {
        let view = ViewDefinition::new("v1", "b1", "", ViewKind::Table);
        let service = service().with_options(ExportOptions::default().with_fallback_title("Board"));
        let artifact = service.build(&board(), Some(&view), &[]).unwrap().unwrap();
        assert_eq!(artifact.filename, "Board.csv");
    }

    #[test]
    fn test_resolve_view_prefers_explicit() {
        let active = view();
        let explicit = ViewDefinition::new("v2", "b1", "Other", ViewKind::Board);
        assert_eq!(
            resolve_view(Some(&active), Some(&explicit)).map(|v| v.id.as_str()),
            Some("v2")
        );
        assert_eq!(resolve_view(Some(&active), None).map(|v| v.id.as_str()), Some("v1"));
        assert!(resolve_view(None, None).is_none());
    }

    #[tokio::test]
    async fn test_export_to_sink() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path());
        let records = vec![Record::for_board("b1", "Fix bug").with_property("p1", "Open")];

        let result = service()
            .export_to_sink(&board(), Some(&view()), &records, &sink)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.exported, 1);
        assert_eq!(
            std::fs::read_to_string(&result.output_path).unwrap(),
            "Name,Status\r\n\"Fix bug\",Open\r\n"
        );
    }

    #[tokio::test]
    async fn test_export_to_sink_without_view() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path());
        let result = service()
            .export_to_sink(&board(), None, &[], &sink)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
