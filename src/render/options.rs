//! Export options and configuration.

use super::JsonFormat;

/// Parameters of the figure extraction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureOptions {
    /// Gap (pixels) under which picture fragments are merged
    pub cluster_threshold: f32,

    /// Minimum width and height (pixels) of a merged cluster
    pub min_size: f32,

    /// Maximum gap (pixels) between a figure and the heading pulled into it
    pub header_max_distance: f32,

    /// Padding (pixels) added around the final crop
    pub padding: f32,
}

impl FigureOptions {
    /// Create new figure options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clustering distance threshold.
    pub fn with_cluster_threshold(mut self, threshold: f32) -> Self {
        self.cluster_threshold = threshold.max(0.0);
        self
    }

    /// Set the minimum cluster size.
    pub fn with_min_size(mut self, size: f32) -> Self {
        self.min_size = size.max(0.0);
        self
    }

    /// Set the heading search distance.
    pub fn with_header_distance(mut self, distance: f32) -> Self {
        self.header_max_distance = distance.max(0.0);
        self
    }

    /// Set the crop padding.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            cluster_threshold: 50.0,
            min_size: 150.0,
            header_max_distance: 200.0,
            padding: 20.0,
        }
    }
}

/// Options for exporting a converted document.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Indentation of every JSON artifact
    pub json_format: JsonFormat,

    /// Figure extraction parameters
    pub figures: FigureOptions,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JSON format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Pretty-print JSON when `pretty` is set, compact otherwise.
    pub fn with_pretty_json(self, pretty: bool) -> Self {
        self.with_json_format(if pretty {
            JsonFormat::Pretty
        } else {
            JsonFormat::Compact
        })
    }

    /// Set the figure options.
    pub fn with_figures(mut self, figures: FigureOptions) -> Self {
        self.figures = figures;
        self
    }
}
