use crate::cleaner::noise_filter::{NoiseFilter, Rejection};
use crate::cleaner::ROOT_NOTES;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, one_of, space0};
use nom::combinator::{all_consuming, opt, recognize, verify};
use nom::multi::{many_m_n, separated_list1};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use std::collections::HashMap;

/// Longest run of modifiers after the main extension, e.g. `sus4` `b9` `add13`
const MAX_MODIFIERS: usize = 3;

/// At most two extensions inside parentheses, e.g. `(b9,13)`
const MAX_ADDED: usize = 2;

/// Structural slots of a token matching the chord grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordShape<'a> {
    pub root: char,
    pub accidental: Option<char>,
    pub quality: Option<&'a str>,
    pub extension: Option<&'a str>,
    pub modifiers: Vec<&'a str>,
    pub added: Vec<&'a str>,
    pub bass: Option<&'a str>,
}

fn parse_root(i: &str) -> IResult<&str, char> {
    one_of(ROOT_NOTES).parse(i)
}

fn parse_accidental(i: &str) -> IResult<&str, char> {
    one_of("#b").parse(i)
}

fn parse_quality(i: &str) -> IResult<&str, &str> {
    alt((
        tag("maj"),
        tag("min"),
        tag("dim"),
        tag("aug"),
        tag("sus"),
        tag("add"),
        tag("m"),
        tag("M"),
    ))
    .parse(i)
}

/// Musically valid extensions, two digit ones first
fn parse_extension(i: &str) -> IResult<&str, &str> {
    alt((
        tag("13"),
        tag("11"),
        tag("10"),
        tag("2"),
        tag("4"),
        tag("5"),
        tag("6"),
        tag("7"),
        tag("9"),
    ))
    .parse(i)
}

/// Altered extension (`b5`, `#11`) or extra quality (`sus4`, `add9`, `M`)
fn parse_modifier(i: &str) -> IResult<&str, &str> {
    alt((
        recognize((one_of("#b+-"), parse_extension)),
        recognize((parse_quality, opt(parse_extension))),
    ))
    .parse(i)
}

/// Single entry of a parenthesized group: `b9`, `13`, `13#`
fn parse_added(i: &str) -> IResult<&str, &str> {
    recognize((
        opt(parse_accidental),
        parse_extension,
        opt(parse_accidental),
    ))
    .parse(i)
}

fn parse_added_group(i: &str) -> IResult<&str, Vec<&str>> {
    verify(
        delimited(
            char('('),
            separated_list1((char(','), space0), parse_added),
            char(')'),
        ),
        |added: &[&str]| added.len() <= MAX_ADDED,
    )
    .parse(i)
}

fn parse_bass(i: &str) -> IResult<&str, &str> {
    preceded(char('/'), recognize((parse_root, opt(parse_accidental)))).parse(i)
}

/// Parse the chord prefix of `i`, leaving whatever does not fit the grammar.
pub fn parse_chord(i: &str) -> IResult<&str, ChordShape<'_>> {
    let (i, root) = parse_root(i)?;
    let (i, accidental) = opt(parse_accidental).parse(i)?;
    let (i, quality) = opt(parse_quality).parse(i)?;
    let (i, extension) = opt(parse_extension).parse(i)?;
    let (i, modifiers) = many_m_n(0, MAX_MODIFIERS, parse_modifier).parse(i)?;
    let (i, added) = opt(parse_added_group).parse(i)?;
    let (i, bass) = opt(parse_bass).parse(i)?;
    let shape = ChordShape {
        root,
        accidental,
        quality,
        extension,
        modifiers,
        added: added.unwrap_or_default(),
        bass,
    };
    Ok((i, shape))
}

/// Parse a whole token; `None` unless every character belongs to the chord.
pub fn parse_token(token: &str) -> Option<ChordShape<'_>> {
    all_consuming(parse_chord)
        .parse(token)
        .ok()
        .map(|(_, shape)| shape)
}

pub fn matches_chord_grammar(token: &str) -> bool {
    parse_token(token).is_some()
}

/// Verdicts keyed by normalized token text, valid for one cleaning run.
#[derive(Debug, Default)]
pub struct ValidationCache {
    verdicts: HashMap<String, bool>,
    hits: usize,
    misses: usize,
}

impl ValidationCache {
    pub fn get(&mut self, text: &str) -> Option<bool> {
        let verdict = self.verdicts.get(text).copied();
        if verdict.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        verdict
    }

    pub fn insert(&mut self, text: &str, verdict: bool) {
        self.verdicts.insert(text.to_string(), verdict);
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub const fn hits(&self) -> usize {
        self.hits
    }

    pub const fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.verdicts.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Decides whether candidate tokens have the shape of a chord.
///
/// A verdict is a pure function of the text: noise rejection first, then the
/// anchored grammar. The cache only avoids recomputing it.
#[derive(Debug)]
pub struct ChordValidator {
    noise_filter: NoiseFilter,
    memoize: bool,
    cache: ValidationCache,
}

impl ChordValidator {
    pub fn new(noise_filter: NoiseFilter, memoize: bool) -> Self {
        Self {
            noise_filter,
            memoize,
            cache: ValidationCache::default(),
        }
    }

    pub const fn noise_filter(&self) -> &NoiseFilter {
        &self.noise_filter
    }

    pub const fn cache(&self) -> &ValidationCache {
        &self.cache
    }

    /// Forget every verdict, called between independent corpus runs.
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    /// Noise check on a normalized token, before it is homogenized.
    ///
    /// Rejected text is cached as invalid, it can never validate later.
    pub fn screen(&mut self, normalized: &str) -> Option<Rejection> {
        let rejection = self.noise_filter.reject(normalized);
        if rejection.is_some() && self.memoize {
            self.cache.insert(normalized, false);
        }
        rejection
    }

    fn compute_verdict(&self, candidate: &str) -> bool {
        self.noise_filter.reject(candidate).is_none() && matches_chord_grammar(candidate)
    }

    pub fn is_chord(&mut self, candidate: &str) -> bool {
        if !self.memoize {
            return self.compute_verdict(candidate);
        }
        if let Some(verdict) = self.cache.get(candidate) {
            return verdict;
        }
        let verdict = self.compute_verdict(candidate);
        log::trace!("caching {candidate:?} as {verdict}");
        self.cache.insert(candidate, verdict);
        verdict
    }

    /// Parse a candidate into its slots, bypassing the cache.
    pub fn parse<'a>(&self, candidate: &'a str) -> Option<ChordShape<'a>> {
        if self.noise_filter.reject(candidate).is_some() {
            return None;
        }
        parse_token(candidate)
    }
}
