// Weighted edge sampling and the plain (unbiased) Markov walk.
//
// `pick_weighted` is the one place an edge is chosen by cumulative weight.
// The draw is taken from `[0, total)`, then the weights are walked in order,
// subtracting each weight until the remainder falls inside an edge. An
// inclusive bound (`[0, total]`) would let the draw equal `total` and match
// no edge, so it is never used.
//
// `plain_line` / `plain_song` generate text straight from graph counts with
// no rhyme memory. They are the baseline the rhyme-aware composer in
// `composer.rs` improves on, and are handy for checking a freshly built
// graph.

use crate::graph::BigramGraph;
use crate::render::render_line;
use lyricist_lang::Token;
use lyricist_prng::RandomSource;

/// Choose one item by cumulative weight.
///
/// Returns `None` when the weights sum to zero (a dead end).
pub fn pick_weighted<'a, T, R: RandomSource>(
    weighted: &'a [(T, u64)],
    rng: &mut R,
) -> Option<&'a T> {
    let total = weighted
        .iter()
        .fold(0u64, |acc, (_, w)| acc.saturating_add(*w));
    if total == 0 {
        return None;
    }
    let mut choice = rng.below(total);
    for (item, weight) in weighted {
        if choice < *weight {
            return Some(item);
        }
        choice -= weight;
    }
    // Unreachable while `choice < total`; a saturated total is below the
    // true sum.
    weighted.iter().rev().find(|(_, w)| *w > 0).map(|(item, _)| item)
}

/// Walk the graph from `previous` until the line boundary, a token in
/// `end_at`, a dead end, or `max_words` words.
///
/// Returns the words of the line and the node to continue from.
pub fn plain_line<R: RandomSource>(
    graph: &BigramGraph,
    previous: &Token,
    max_words: usize,
    end_at: &[Token],
    rng: &mut R,
) -> (Vec<Token>, Token) {
    let mut line = Vec::new();
    let mut node = previous.clone();
    while line.len() < max_words {
        let Some(edges) = graph.successors(&node) else {
            break;
        };
        let weighted: Vec<(&Token, u64)> = edges.iter().map(|(t, &c)| (t, c)).collect();
        let Some(&next) = pick_weighted(&weighted, rng) else {
            break;
        };
        if next.is_boundary() {
            return (line, Token::LineBoundary);
        }
        line.push(next.clone());
        node = next.clone();
        if end_at.contains(next) {
            break;
        }
    }
    // Truncated or stuck: the next line starts fresh.
    let resume = if graph.out_weight(&node) == 0 {
        Token::LineBoundary
    } else {
        node
    };
    (line, resume)
}

/// Generate `lines` rendered lines by repeated `plain_line` calls.
pub fn plain_song<R: RandomSource>(
    graph: &BigramGraph,
    lines: usize,
    max_words: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut previous = Token::LineBoundary;
    let mut out = Vec::with_capacity(lines);
    for _ in 0..lines {
        let (line, next) = plain_line(graph, &previous, max_words, &[], rng);
        out.push(render_line(&line));
        previous = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildOptions;
    use lyricist_lang::Tokenizer;
    use lyricist_prng::{LyricRng, ScriptedSource};

    fn graph(lines: &[&str]) -> BigramGraph {
        let song = Tokenizer::new().tokenize_song(lines);
        BigramGraph::build(&[song], BuildOptions::default())
    }

    #[test]
    fn test_pick_weighted_boundaries() {
        let weighted = [("a", 2u64), ("b", 0), ("c", 3)];
        // Draws 0..2 land on "a", 2..5 on "c"; "b" is never chosen.
        let expected = ["a", "a", "c", "c", "c"];
        for (draw, want) in expected.iter().enumerate() {
            let mut rng = ScriptedSource::new(vec![draw as u64]);
            assert_eq!(pick_weighted(&weighted, &mut rng), Some(want));
        }
    }

    #[test]
    fn test_pick_weighted_dead_end() {
        let weighted = [("a", 0u64), ("b", 0)];
        let mut rng = ScriptedSource::new(vec![0]);
        assert_eq!(pick_weighted(&weighted, &mut rng), None);
        assert_eq!(rng.consumed(), 0);
        let empty: [(&str, u64); 0] = [];
        assert_eq!(pick_weighted(&empty, &mut rng), None);
    }

    #[test]
    fn test_pick_weighted_saturated_total() {
        let weighted = [("a", u64::MAX), ("b", u64::MAX)];
        let mut rng = ScriptedSource::new(vec![u64::MAX - 1]);
        assert_eq!(pick_weighted(&weighted, &mut rng), Some(&"a"));
    }

    #[test]
    fn test_pick_weighted_distribution() {
        let weighted = [("rare", 1u64), ("common", 9)];
        let mut rng = LyricRng::new(7);
        let mut common = 0;
        for _ in 0..10_000 {
            if pick_weighted(&weighted, &mut rng) == Some(&"common") {
                common += 1;
            }
        }
        assert!((8_500..9_500).contains(&common), "common chosen {common} times");
    }

    #[test]
    fn test_plain_line_stops_at_boundary() {
        let g = graph(&["hello world"]);
        let mut rng = LyricRng::new(1);
        let (line, next) = plain_line(&g, &Token::LineBoundary, 10, &[], &mut rng);
        assert_eq!(line, vec![Token::word("hello"), Token::word("world")]);
        assert_eq!(next, Token::LineBoundary);
    }

    #[test]
    fn test_plain_line_respects_max_words() {
        let g = graph(&["la la la la la la la la"]);
        // From "la" the boundary sorts first; a draw of 5 always skips it.
        let mut rng = ScriptedSource::new(vec![5]);
        let (line, _) = plain_line(&g, &Token::LineBoundary, 3, &[], &mut rng);
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_plain_line_end_at() {
        let g = graph(&["stop . go on"]);
        let mut rng = LyricRng::new(3);
        let (line, next) = plain_line(&g, &Token::LineBoundary, 10, &[Token::word(".")], &mut rng);
        assert_eq!(line, vec![Token::word("stop"), Token::word(".")]);
        assert_eq!(next, Token::word("."));
    }

    #[test]
    fn test_plain_song_line_count_and_determinism() {
        let g = graph(&["the night is young", "the stars are bright"]);
        let a = plain_song(&g, 5, 8, &mut LyricRng::new(11));
        let b = plain_song(&g, 5, 8, &mut LyricRng::new(11));
        assert_eq!(a.len(), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_plain_song_empty_graph() {
        let g = BigramGraph::new();
        let song = plain_song(&g, 2, 5, &mut LyricRng::new(0));
        assert_eq!(song, vec![String::new(), String::new()]);
    }
}
