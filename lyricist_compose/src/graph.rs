// Bigram transition graph.
//
// `BigramGraph` maps each predecessor token to a table of successor tokens
// and their observed transition counts. The line boundary is an ordinary node:
// its successors are the line-initial words, and transitions into it mark
// line-final words.
//
// Construction is pure aggregation over a tokenized corpus. Counts only ever
// increase while building; the composer only reads. Two reset policies
// decide where the boundary appears (see `ResetPolicy`):
//
// - per line: every line is `∅ -> w1 -> ... -> wn -> ∅`;
// - per song: lines run into each other and only the song is bracketed.
//
// Lookups never insert. An absent node has no successors and an absent edge
// has count 0.
//
// The reverse graph (every edge flipped, counts kept) is derived on demand
// with `reverse()`; nothing in composition needs it eagerly.

use crate::config::{BuildOptions, ResetPolicy};
use lyricist_lang::{Token, TokenizedSong};
use std::collections::BTreeMap;

/// Successor table for one node: successor -> count.
pub type EdgeTable = BTreeMap<Token, u64>;

/// Directed weighted bigram graph over tokens and the line boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BigramGraph {
    nodes: BTreeMap<Token, EdgeTable>,
}

impl BigramGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from tokenized songs.
    pub fn build(songs: &[TokenizedSong], options: BuildOptions) -> Self {
        let mut graph = BigramGraph::new();
        let mut lines = 0usize;
        for song in songs {
            match options.reset {
                ResetPolicy::PerLine => {
                    // Each line already closes on the boundary, so the song
                    // end adds no extra edge.
                    for line in song {
                        graph.add_sequence(line);
                        lines += 1;
                    }
                }
                ResetPolicy::PerSong => {
                    if song.is_empty() {
                        continue;
                    }
                    graph.add_sequence(song.iter().flatten());
                    lines += song.len();
                }
            }
        }
        tracing::debug!(
            songs = songs.len(),
            lines,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            reset = ?options.reset,
            "built bigram graph"
        );
        graph
    }

    /// Add one boundary-to-boundary run of words.
    fn add_sequence<'a, I>(&mut self, words: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut previous = Token::LineBoundary;
        for word in words {
            let next = Token::word(word.as_str());
            self.add_edge(previous, next.clone(), 1);
            previous = next;
        }
        self.add_edge(previous, Token::LineBoundary, 1);
    }

    /// Increase the count of `from -> to` by `count`.
    pub fn add_edge(&mut self, from: Token, to: Token, count: u64) {
        *self.nodes.entry(from).or_default().entry(to).or_insert(0) += count;
    }

    /// Successor table of `node`, or `None` if it has no outgoing edges.
    pub fn successors(&self, node: &Token) -> Option<&EdgeTable> {
        self.nodes.get(node)
    }

    /// Count of `from -> to`; 0 when the edge was never observed.
    pub fn count(&self, from: &Token, to: &Token) -> u64 {
        self.nodes
            .get(from)
            .and_then(|edges| edges.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of outgoing counts of `node`.
    pub fn out_weight(&self, node: &Token) -> u64 {
        self.nodes.get(node).map_or(0, |edges| edges.values().sum())
    }

    /// Words observed at the start of a line.
    pub fn line_starts(&self) -> Vec<&Token> {
        self.nodes
            .get(&Token::LineBoundary)
            .map(|edges| edges.keys().filter(|t| !t.is_boundary()).collect())
            .unwrap_or_default()
    }

    /// Every token that appears as a predecessor or successor, boundary
    /// included, in sorted order without repeats.
    pub fn vocabulary(&self) -> Vec<&Token> {
        let mut seen: std::collections::BTreeSet<&Token> = std::collections::BTreeSet::new();
        for (node, edges) in &self.nodes {
            seen.insert(node);
            seen.extend(edges.keys());
        }
        seen.into_iter().collect()
    }

    /// All edges as `(from, to, count)`, in node order.
    pub fn edges(&self) -> impl Iterator<Item = (&Token, &Token, u64)> {
        self.nodes
            .iter()
            .flat_map(|(from, edges)| edges.iter().map(move |(to, &count)| (from, to, count)))
    }

    /// The same graph with every edge flipped: `reverse[b][a] == self[a][b]`.
    pub fn reverse(&self) -> BigramGraph {
        let mut reversed = BigramGraph::new();
        for (from, to, count) in self.edges() {
            reversed.add_edge(to.clone(), from.clone(), count);
        }
        reversed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
