//! Tabular content.

use crate::block::{Block, RenderContext};
use crate::error::BlockError;
use crate::settings::{BlockOptions, BlockSettings};
use bloqs_idf::Element;
use bloqs_style::{Cfg, CfgValue};

pub const TABLE_CLASS: &str = "bloqs-table";

/// Column headers plus rows of cell values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    columns: Vec<String>,
    index: Option<Vec<String>>,
    rows: Vec<Vec<CfgValue>>,
}

impl TableData {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            index: None,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with empty cells when written.
    pub fn row<I, V>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CfgValue>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Row labels, written as a leading header column.
    pub fn index<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CfgValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Renders [`TableData`] as an HTML table with a header row.
#[derive(Debug, Clone)]
pub struct TableBlock {
    settings: BlockSettings,
    data: TableData,
    float_precision: Option<usize>,
}

impl TableBlock {
    pub fn new(data: TableData, options: BlockOptions) -> Self {
        let mut settings: BlockSettings = options.into();
        settings.provide_default_cfg(&Cfg::from([("overflow_x", "auto")]));
        Self {
            settings,
            data,
            float_precision: None,
        }
    }

    /// Formats floating point cells with a fixed number of decimals.
    pub fn float_precision(mut self, decimals: usize) -> Self {
        self.float_precision = Some(decimals);
        self
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    fn format_cell(&self, value: &CfgValue) -> String {
        match (value, self.float_precision) {
            (CfgValue::Float(f), Some(precision)) => format!("{:.*}", precision, f),
            (CfgValue::Null, _) => String::new(),
            (other, _) => other.to_string(),
        }
    }
}

impl Block for TableBlock {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn write_contents(
        &self,
        container: &mut Element,
        _cfg: &Cfg,
        _ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        let width = self.data.columns.len();
        if let Some(bad) = self.data.rows.iter().position(|r| r.len() > width) {
            return Err(BlockError::InvalidContent(format!(
                "table row {} has {} cells but there are {} columns",
                bad,
                self.data.rows[bad].len(),
                width
            )));
        }

        let table = container.append("table");
        table.set_attr("class", TABLE_CLASS);

        let header = table.append("thead").append("tr");
        if self.data.index.is_some() {
            header.append("th");
        }
        for column in &self.data.columns {
            header.append("th").append_text(column.as_str());
        }

        let body = table.append("tbody");
        for (i, row) in self.data.rows.iter().enumerate() {
            let tr = body.append("tr");
            if let Some(index) = &self.data.index {
                let label = index.get(i).map(String::as_str).unwrap_or_default();
                tr.append("th").append_text(label);
            }
            for col in 0..width {
                let text = row.get(col).map(|v| self.format_cell(v)).unwrap_or_default();
                tr.append("td").append_text(text);
            }
        }
        Ok(())
    }
}
