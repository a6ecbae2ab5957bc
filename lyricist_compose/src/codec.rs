// Graph persistence as headerless CSV.
//
// One row per distinct edge: `predecessor,successor,count`. The line boundary
// is written as an empty field, which no real token can be (the tokenizer
// never produces an empty string). Counts are decimal. Rows are written in
// node order, but readers must not rely on it: duplicate rows for the same
// edge are summed, which is what re-aggregating a split dump needs.
//
// Loading is all-or-nothing. A row with the wrong number of fields or a count
// that is not a non-negative integer fails with `CorruptGraphData` naming the
// 1-based row; nothing is partially recovered.

use crate::error::LyricError;
use crate::graph::BigramGraph;
use lyricist_lang::Token;
use std::io::{Read, Write};
use std::path::Path;

/// One persisted edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRow {
    pub from: Token,
    pub to: Token,
    pub count: u64,
}

fn encode(token: &Token) -> &str {
    token.as_word().unwrap_or("")
}

fn decode(field: &str) -> Token {
    if field.is_empty() {
        Token::LineBoundary
    } else {
        Token::word(field)
    }
}

/// Flatten a graph into rows, in node order.
pub fn graph_rows(graph: &BigramGraph) -> Vec<EdgeRow> {
    graph
        .edges()
        .map(|(from, to, count)| EdgeRow {
            from: from.clone(),
            to: to.clone(),
            count,
        })
        .collect()
}

/// Rebuild a graph from rows, summing duplicates.
pub fn graph_from_rows<I: IntoIterator<Item = EdgeRow>>(rows: I) -> BigramGraph {
    let mut graph = BigramGraph::new();
    for row in rows {
        graph.add_edge(row.from, row.to, row.count);
    }
    graph
}

/// Write `graph` as CSV rows.
pub fn write_graph<W: Write>(graph: &BigramGraph, writer: W) -> Result<(), LyricError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    let mut rows = 0usize;
    for (from, to, count) in graph.edges() {
        csv.write_record([encode(from), encode(to), count.to_string().as_str()])?;
        rows += 1;
    }
    csv.flush()?;
    tracing::debug!(rows, "wrote graph");
    Ok(())
}

/// Read a graph written by `write_graph`.
pub fn read_graph<R: Read>(reader: R) -> Result<BigramGraph, LyricError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (idx, record) in csv.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|e| LyricError::corrupt(row, e.to_string()))?;
        if record.len() != 3 {
            return Err(LyricError::corrupt(
                row,
                format!("expected 3 fields, found {}", record.len()),
            ));
        }
        let count: u64 = record[2]
            .parse()
            .map_err(|_| LyricError::corrupt(row, format!("bad count {:?}", &record[2])))?;
        rows.push(EdgeRow {
            from: decode(&record[0]),
            to: decode(&record[1]),
            count,
        });
    }
    tracing::debug!(rows = rows.len(), "read graph");
    Ok(graph_from_rows(rows))
}

/// Write `graph` to a file, replacing it.
pub fn dump_graph(graph: &BigramGraph, path: &Path) -> Result<(), LyricError> {
    let file = std::fs::File::create(path)?;
    write_graph(graph, std::io::BufWriter::new(file))
}

/// Load a graph file.
pub fn load_graph(path: &Path) -> Result<BigramGraph, LyricError> {
    let file = std::fs::File::open(path)?;
    read_graph(std::io::BufReader::new(file))
}
