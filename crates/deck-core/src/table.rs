//! Table element payload: a rectangular grid of cell texts with per-cell
//! style overlays and merged regions.
//!
//! Row 0 is conventionally the header row. `data` and `styles` are kept the
//! same rectangular shape by every operation.
//!
//! Merged regions never overlap. A merged region renders with the style of
//! its anchor (top-left) cell; overlays on the other covered cells are kept
//! but ignored until the region is unmerged.

use crate::model::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    None,
}

impl BorderStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            "double" => Some(Self::Double),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellBorder {
    pub width: f32,
    pub color: Color,
    pub style: BorderStyle,
}

/// Style overlay for one cell. `None` fields fall through to the theme.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<CellBorder>,
}

impl CellStyle {
    /// `self` with every `None` field filled from `base`.
    fn over(self, base: CellStyle) -> CellStyle {
        CellStyle {
            background: self.background.or(base.background),
            text_color: self.text_color.or(base.text_color),
            border: self.border.or(base.border),
        }
    }
}

/// Built-in table looks applied underneath the per-cell overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableTheme {
    #[default]
    Plain,
    Striped,
    HeaderAccent,
    Grid,
}

impl TableTheme {
    pub fn default_style(self, row: usize, _col: usize) -> CellStyle {
        let accent = Color::rgb(0x44, 0x72, 0xC4);
        let thin = |color| {
            Some(CellBorder {
                width: 1.0,
                color,
                style: BorderStyle::Solid,
            })
        };
        match self {
            TableTheme::Plain => CellStyle {
                border: thin(Color::rgb(0xCC, 0xCC, 0xCC)),
                ..CellStyle::default()
            },
            TableTheme::Striped => CellStyle {
                background: (row % 2 == 1).then_some(Color::rgb(0xF2, 0xF2, 0xF2)),
                ..CellStyle::default()
            },
            TableTheme::HeaderAccent if row == 0 => CellStyle {
                background: Some(accent),
                text_color: Some(Color::WHITE),
                border: thin(accent),
            },
            TableTheme::HeaderAccent => CellStyle {
                border: thin(accent),
                ..CellStyle::default()
            },
            TableTheme::Grid => CellStyle {
                border: thin(Color::BLACK),
                ..CellStyle::default()
            },
        }
    }
}

/// A rectangular block of cells anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl CellRange {
    pub fn new(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self {
            row,
            col,
            rows,
            cols,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row + self.rows && col >= self.col && col < self.col + self.cols
    }

    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.row < other.row + other.rows
            && other.row < self.row + self.rows
            && self.col < other.col + other.cols
            && other.col < self.col + self.cols
    }

    /// Stable key listing the covered cells, e.g. `0-0,0-1`.
    pub fn key(&self) -> String {
        let mut cells = Vec::with_capacity(self.rows * self.cols);
        for r in self.row..self.row + self.rows {
            for c in self.col..self.col + self.cols {
                cells.push(format!("{r}-{c}"));
            }
        }
        cells.join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRegion {
    pub range: CellRange,
    pub content: String,
}

/// Table element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTable", rename_all = "camelCase")]
pub struct TableData {
    pub data: Vec<Vec<String>>,
    pub theme: TableTheme,
    pub styles: Vec<Vec<CellStyle>>,
    pub merged: Vec<MergedRegion>,
}

/// Unvalidated wire form; normalized into `TableData` on load.
///
/// Older decks keep overlays as parallel `cellBackground`, `cellTextColor`
/// and `cellBorder` grids and merges as a `mergedCells` map keyed by the
/// covered cell ids. Both shapes are accepted.
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTable {
    data: Vec<Vec<String>>,
    theme: TableTheme,
    styles: Vec<Vec<CellStyle>>,
    merged: Vec<MergedRegion>,
    cell_background: Vec<Vec<Option<String>>>,
    cell_text_color: Vec<Vec<Option<String>>>,
    cell_border: RawBorders,
    merged_cells: BTreeMap<String, RawMergedCells>,
}

impl Default for RawTable {
    fn default() -> Self {
        Self {
            data: vec![vec![String::new()]],
            theme: TableTheme::default(),
            styles: Vec::new(),
            merged: Vec::new(),
            cell_background: Vec::new(),
            cell_text_color: Vec::new(),
            cell_border: RawBorders::default(),
            merged_cells: BTreeMap::new(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawBorders {
    width: Vec<Vec<Option<f32>>>,
    color: Vec<Vec<Option<String>>>,
    style: Vec<Vec<Option<String>>>,
}

impl RawBorders {
    fn at(&self, row: usize, col: usize) -> Option<CellBorder> {
        fn cell<T: Clone>(grid: &[Vec<Option<T>>], row: usize, col: usize) -> Option<T> {
            grid.get(row)?.get(col)?.clone()
        }
        let width = cell(&self.width, row, col);
        let color = cell(&self.color, row, col).and_then(|c| Color::from_hex(&c));
        let style = cell(&self.style, row, col).and_then(|s| BorderStyle::from_name(&s));
        if width.is_none() && color.is_none() && style.is_none() {
            return None;
        }
        Some(CellBorder {
            width: width.unwrap_or(1.0),
            color: color.unwrap_or(Color::BLACK),
            style: style.unwrap_or_default(),
        })
    }

    fn rows(&self) -> usize {
        self.width.len().max(self.color.len()).max(self.style.len())
    }

    fn cols(&self, row: usize) -> usize {
        fn len<T>(grid: &[Vec<T>], row: usize) -> usize {
            grid.get(row).map_or(0, Vec::len)
        }
        len(&self.width, row)
            .max(len(&self.color, row))
            .max(len(&self.style, row))
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawMergedCells {
    cells: Vec<String>,
    content: String,
}

/// Bounding block of cell ids like `2-0` (any prefix before the last two
/// dash-separated numbers is ignored).
fn range_of_cells<'a>(cells: impl IntoIterator<Item = &'a str>) -> Option<CellRange> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for id in cells {
        let mut parts = id.trim().rsplit('-');
        let col: usize = parts.next()?.parse().ok()?;
        let row: usize = parts.next()?.parse().ok()?;
        bounds = Some(match bounds {
            None => (row, col, row, col),
            Some((r0, c0, r1, c1)) => (r0.min(row), c0.min(col), r1.max(row), c1.max(col)),
        });
    }
    let (r0, c0, r1, c1) = bounds?;
    Some(CellRange::new(r0, c0, r1 - r0 + 1, c1 - c0 + 1))
}

impl From<RawTable> for TableData {
    fn from(raw: RawTable) -> Self {
        let mut table = TableData {
            data: raw.data,
            theme: raw.theme,
            styles: raw.styles,
            merged: Vec::new(),
        };
        table.normalize();

        let colors = |grid: &[Vec<Option<String>>]| -> Vec<(usize, usize, Color)> {
            grid.iter()
                .enumerate()
                .flat_map(|(r, row)| {
                    row.iter().enumerate().filter_map(move |(c, hex)| {
                        hex.as_deref().and_then(Color::from_hex).map(|color| (r, c, color))
                    })
                })
                .collect()
        };
        for (r, c, color) in colors(&raw.cell_background) {
            table.set_cell_style(r, c, |s| s.background = Some(color));
        }
        for (r, c, color) in colors(&raw.cell_text_color) {
            table.set_cell_style(r, c, |s| s.text_color = Some(color));
        }
        for r in 0..raw.cell_border.rows() {
            for c in 0..raw.cell_border.cols(r) {
                if let Some(border) = raw.cell_border.at(r, c) {
                    table.set_cell_style(r, c, |s| s.border = Some(border));
                }
            }
        }

        for region in raw.merged {
            if !table.merge_region(region.range, Some(region.content)) {
                log::warn!("dropping invalid merged region {}", region.range.key());
            }
        }
        for (key, cells) in raw.merged_cells {
            let range = if cells.cells.is_empty() {
                range_of_cells(key.split(','))
            } else {
                range_of_cells(cells.cells.iter().map(String::as_str))
            };
            match range {
                Some(range) if table.merge_region(range, Some(cells.content)) => {}
                _ => log::warn!("dropping invalid merged cells {key}"),
            }
        }
        table
    }
}

impl TableData {
    /// A `rows × cols` table (at least 1×1) with a labelled header row.
    pub fn new(rows: usize, cols: usize) -> Self {
        let (rows, cols) = (rows.max(1), cols.max(1));
        let mut data = vec![vec![String::new(); cols]; rows];
        for (c, cell) in data[0].iter_mut().enumerate() {
            *cell = format!("Header {}", c + 1);
        }
        Self {
            data,
            theme: TableTheme::default(),
            styles: vec![vec![CellStyle::default(); cols]; rows],
            merged: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Pad ragged rows and resize `styles` to match `data`.
    fn normalize(&mut self) {
        if self.data.is_empty() {
            self.data.push(Vec::new());
        }
        let cols = self.data.iter().map(Vec::len).max().unwrap_or(0).max(1);
        for row in &mut self.data {
            row.resize(cols, String::new());
        }
        self.styles.resize(self.data.len(), Vec::new());
        for row in &mut self.styles {
            row.resize(cols, CellStyle::default());
        }
    }

    pub fn region_at(&self, row: usize, col: usize) -> Option<&MergedRegion> {
        self.merged.iter().find(|m| m.range.contains(row, col))
    }

    /// Text shown in a cell: the region content for a merge anchor, nothing
    /// for the other covered cells, the cell text otherwise.
    pub fn display_text(&self, row: usize, col: usize) -> Option<&str> {
        match self.region_at(row, col) {
            Some(m) if (m.range.row, m.range.col) == (row, col) => Some(&m.content),
            Some(_) => None,
            None => self.data.get(row)?.get(col).map(String::as_str),
        }
    }

    /// Set the text of a cell (or of the merged region covering it).
    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) -> bool {
        if row >= self.rows() || col >= self.cols() {
            return false;
        }
        let text = text.into();
        if let Some(region) = self.merged.iter_mut().find(|m| m.range.contains(row, col)) {
            region.content = text;
        } else {
            self.data[row][col] = text;
        }
        true
    }

    /// Mutate the style overlay of one cell.
    pub fn set_cell_style(&mut self, row: usize, col: usize, f: impl FnOnce(&mut CellStyle)) -> bool {
        match self.styles.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(style) => {
                f(style);
                true
            }
            None => false,
        }
    }

    /// Resolved style: overlay of the cell (or its region's anchor) on top
    /// of the theme.
    pub fn effective_style(&self, row: usize, col: usize) -> CellStyle {
        let (r, c) = self
            .region_at(row, col)
            .map_or((row, col), |m| (m.range.row, m.range.col));
        let overlay = self
            .styles
            .get(r)
            .and_then(|s| s.get(c))
            .copied()
            .unwrap_or_default();
        overlay.over(self.theme.default_style(r, c))
    }

    pub fn insert_row(&mut self, at: usize) {
        let at = at.min(self.rows());
        let cols = self.cols();
        self.data.insert(at, vec![String::new(); cols]);
        self.styles.insert(at, vec![CellStyle::default(); cols]);
        for m in &mut self.merged {
            if m.range.row >= at {
                m.range.row += 1;
            } else if at < m.range.row + m.range.rows {
                m.range.rows += 1;
            }
        }
    }

    pub fn insert_column(&mut self, at: usize) {
        let at = at.min(self.cols());
        for row in &mut self.data {
            row.insert(at, String::new());
        }
        for row in &mut self.styles {
            row.insert(at, CellStyle::default());
        }
        for m in &mut self.merged {
            if m.range.col >= at {
                m.range.col += 1;
            } else if at < m.range.col + m.range.cols {
                m.range.cols += 1;
            }
        }
    }

    /// Delete a row. Refused for the last remaining row. Regions touching
    /// the row are unmerged first.
    pub fn delete_row(&mut self, at: usize) -> bool {
        if self.rows() <= 1 || at >= self.rows() {
            return false;
        }
        let touching: Vec<CellRange> = self
            .merged
            .iter()
            .filter(|m| at >= m.range.row && at < m.range.row + m.range.rows)
            .map(|m| m.range)
            .collect();
        for range in touching {
            self.unmerge(range.row, range.col);
        }
        self.data.remove(at);
        self.styles.remove(at);
        for m in &mut self.merged {
            if m.range.row > at {
                m.range.row -= 1;
            }
        }
        true
    }

    /// Delete a column. Refused for the last remaining column.
    pub fn delete_column(&mut self, at: usize) -> bool {
        if self.cols() <= 1 || at >= self.cols() {
            return false;
        }
        let touching: Vec<CellRange> = self
            .merged
            .iter()
            .filter(|m| at >= m.range.col && at < m.range.col + m.range.cols)
            .map(|m| m.range)
            .collect();
        for range in touching {
            self.unmerge(range.row, range.col);
        }
        for row in &mut self.data {
            row.remove(at);
        }
        for row in &mut self.styles {
            row.remove(at);
        }
        for m in &mut self.merged {
            if m.range.col > at {
                m.range.col -= 1;
            }
        }
        true
    }

    /// Merge a block of cells. Refused for single cells, out-of-bounds
    /// ranges, and ranges overlapping an existing region. The region's
    /// content is the non-empty cell texts joined by spaces.
    pub fn merge(&mut self, range: CellRange) -> bool {
        self.merge_region(range, None)
    }

    fn merge_region(&mut self, range: CellRange, content: Option<String>) -> bool {
        if range.rows == 0
            || range.cols == 0
            || range.rows * range.cols < 2
            || range.row + range.rows > self.rows()
            || range.col + range.cols > self.cols()
            || self.merged.iter().any(|m| m.range.overlaps(&range))
        {
            return false;
        }
        let content = content.unwrap_or_else(|| {
            self.data[range.row..range.row + range.rows]
                .iter()
                .flat_map(|row| &row[range.col..range.col + range.cols])
                .filter(|t| !t.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        });
        self.merged.push(MergedRegion { range, content });
        true
    }

    /// Split the region covering `(row, col)`. Its content goes back into
    /// the anchor cell.
    pub fn unmerge(&mut self, row: usize, col: usize) -> bool {
        let Some(pos) = self.merged.iter().position(|m| m.range.contains(row, col)) else {
            return false;
        };
        let region = self.merged.remove(pos);
        self.data[region.range.row][region.range.col] = region.content;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled(rows: usize, cols: usize) -> TableData {
        let mut t = TableData::new(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                t.set_cell(r, c, format!("{r}{c}"));
            }
        }
        t
    }

    #[test]
    fn new_table_has_header_row() {
        let t = TableData::new(3, 2);
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.data[0], vec!["Header 1", "Header 2"]);
        assert_eq!(TableData::new(0, 0).rows(), 1);
    }

    #[test]
    fn merge_joins_content_and_covers_cells() {
        let mut t = filled(3, 3);
        assert!(t.merge(CellRange::new(0, 0, 2, 2)));
        assert_eq!(t.display_text(0, 0), Some("00 01 10 11"));
        assert_eq!(t.display_text(1, 1), None);
        assert_eq!(t.display_text(2, 2), Some("22"));
        assert_eq!(t.merged[0].range.key(), "0-0,0-1,1-0,1-1");
    }

    #[test]
    fn merge_rejects_overlap_and_single_cells() {
        let mut t = filled(3, 3);
        assert!(t.merge(CellRange::new(0, 0, 2, 2)));
        assert!(!t.merge(CellRange::new(1, 1, 2, 2)));
        assert!(!t.merge(CellRange::new(2, 2, 1, 1)));
        assert!(!t.merge(CellRange::new(2, 1, 1, 5)));
        assert!(t.merge(CellRange::new(2, 0, 1, 3)));
    }

    #[test]
    fn unmerge_restores_anchor_text() {
        let mut t = filled(2, 2);
        t.merge(CellRange::new(0, 0, 1, 2));
        t.set_cell(0, 1, "joined");
        assert!(t.unmerge(0, 1));
        assert_eq!(t.data[0][0], "joined");
        assert_eq!(t.data[0][1], "01");
        assert!(!t.unmerge(0, 1));
    }

    #[test]
    fn merged_region_uses_anchor_style() {
        let mut t = filled(2, 2);
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        t.set_cell_style(0, 0, |s| s.background = Some(red));
        t.set_cell_style(0, 1, |s| s.background = Some(blue));
        t.merge(CellRange::new(0, 0, 1, 2));
        assert_eq!(t.effective_style(0, 1).background, Some(red));

        t.unmerge(0, 0);
        assert_eq!(t.effective_style(0, 1).background, Some(blue));
    }

    #[test]
    fn theme_fills_under_overlay() {
        let mut t = TableData::new(3, 2);
        t.theme = TableTheme::HeaderAccent;
        assert_eq!(t.effective_style(0, 0).text_color, Some(Color::WHITE));
        t.set_cell_style(0, 0, |s| s.text_color = Some(Color::BLACK));
        assert_eq!(t.effective_style(0, 0).text_color, Some(Color::BLACK));
        assert!(t.effective_style(0, 0).background.is_some());
    }

    #[test]
    fn insert_row_shifts_and_grows_regions() {
        let mut t = filled(4, 2);
        t.merge(CellRange::new(1, 0, 2, 2));
        t.insert_row(2);
        assert_eq!(t.rows(), 5);
        assert_eq!(t.merged[0].range, CellRange::new(1, 0, 3, 2));
        t.insert_row(0);
        assert_eq!(t.merged[0].range, CellRange::new(2, 0, 3, 2));
        assert_eq!(t.styles.len(), 6);
    }

    #[test]
    fn delete_column_unmerges_touching_regions() {
        let mut t = filled(2, 3);
        t.merge(CellRange::new(0, 1, 2, 2));
        assert!(t.delete_column(2));
        assert!(t.merged.is_empty());
        assert_eq!(t.cols(), 2);
        assert_eq!(t.data[0], vec!["00", "01 02 11 12"]);
    }

    #[test]
    fn never_deletes_last_row_or_column() {
        let mut t = TableData::new(1, 1);
        assert!(!t.delete_row(0));
        assert!(!t.delete_column(0));
        assert_eq!((t.rows(), t.cols()), (1, 1));
    }

    #[test]
    fn overlay_grids_and_merged_cells_load() {
        let json = r##"{"data":[["a","b"],["c","d"],["e","f"]],
                       "cellBackground":[[null,"#FF0000"],["not a color"]],
                       "cellTextColor":[[],[null,"#00FF00"]],
                       "cellBorder":{"width":[[3]],"style":[[null,"dotted"]]},
                       "mergedCells":{"2-0,2-1":{"cells":["cell-2-0","cell-2-1"],"content":"ef"},
                                      "0-0,1-0":{"content":"ac"}}}"##;
        let t: TableData = serde_json::from_str(json).unwrap();
        assert_eq!(t.styles[0][1].background, Some(Color::rgb(255, 0, 0)));
        assert_eq!(t.styles[1][0], CellStyle::default());
        assert_eq!(t.styles[1][1].text_color, Some(Color::rgb(0, 255, 0)));
        assert_eq!(
            t.styles[0][0].border,
            Some(CellBorder {
                width: 3.0,
                color: Color::BLACK,
                style: BorderStyle::Solid,
            })
        );
        assert_eq!(t.styles[0][1].border.map(|b| b.style), Some(BorderStyle::Dotted));

        assert_eq!(t.merged.len(), 2);
        assert_eq!(t.display_text(0, 0), Some("ac"));
        assert_eq!(t.display_text(1, 0), None);
        assert_eq!(t.display_text(2, 0), Some("ef"));
        assert_eq!(t.region_at(2, 1).map(|m| m.range), Some(CellRange::new(2, 0, 1, 2)));
    }

    #[test]
    fn ragged_json_is_normalized() {
        let json = r#"{"data":[["a","b","c"],["d"]],
                       "merged":[{"range":{"row":0,"col":0,"rows":1,"cols":2},"content":"ab"},
                                 {"range":{"row":0,"col":1,"rows":2,"cols":1},"content":"x"}]}"#;
        let t: TableData = serde_json::from_str(json).unwrap();
        assert_eq!(t.data[1], vec!["d", "", ""]);
        assert_eq!(t.styles.len(), 2);
        assert_eq!(t.styles[1].len(), 3);
        // Second region overlaps the first and is dropped.
        assert_eq!(t.merged.len(), 1);
    }
}
