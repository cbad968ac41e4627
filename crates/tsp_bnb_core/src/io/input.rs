use std::{
    fs,
    io::Read,
    iter::Enumerate,
    path::{Path, PathBuf},
    str::SplitWhitespace,
};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tsp_bnb_derive::{CliValue, KvDisplay};

use crate::{CitySet, DistanceMatrix, Error, Result, options::SolverOptions};

/// Text layout of a distance matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "format")]
pub enum InputFormat {
    /// `n m` then `m` lines of `u v w`. Missing edges are infinite.
    Edges,
    /// `n` then `n * n` weights, row-major.
    #[cli(alias = "dense")]
    Matrix,
}

/// Where and how to read the distance matrix.
#[derive(Clone, Debug, KvDisplay)]
pub struct MatrixInput {
    #[kv(fmt = "debug")]
    path: Option<PathBuf>,
    format: InputFormat,
    #[kv(name = "shuffle_seed", fmt = "debug")]
    shuffle: Option<u64>,
}

impl MatrixInput {
    pub fn new(format: InputFormat) -> Self {
        Self {
            path: None,
            format,
            shuffle: None,
        }
    }

    pub fn from_options(options: &SolverOptions) -> Self {
        let mut input = Self::new(options.format);
        input.path = options.input_path().map(Path::to_path_buf);
        if options.shuffle {
            input.shuffle = Some(options.seed);
        }
        input
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Relabel cities `1..n` with a seeded random permutation after parsing.
    pub fn shuffle(mut self, seed: u64) -> Self {
        self.shuffle = Some(seed);
        self
    }

    /// Reads from the configured file, or stdin when no path is set.
    pub fn read(&self) -> Result<DistanceMatrix> {
        let text = match &self.path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::invalid_input(format!("failed to read input {}: {e}", path.display()))
            })?,
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
        };
        self.parse(&text)
    }

    pub fn parse(&self, text: &str) -> Result<DistanceMatrix> {
        let matrix = match self.format {
            InputFormat::Edges => parse_edges(text)?,
            InputFormat::Matrix => parse_dense(text)?,
        };
        log::debug!(
            "input: parsed n={} finite_edges={}",
            matrix.n(),
            matrix.finite_edges()
        );
        match self.shuffle {
            Some(seed) => shuffle_cities(&matrix, seed),
            None => Ok(matrix),
        }
    }
}

/// Randomly renames cities `1..n`, keeping city 0 as the start. The optimal
/// tour length is unchanged; only the order the search meets cities differs.
pub fn shuffle_cities(matrix: &DistanceMatrix, seed: u64) -> Result<DistanceMatrix> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (1..matrix.n()).collect();
    order.shuffle(&mut rng);
    order.insert(0, 0);
    log::debug!("input: shuffled seed={seed} order={order:?}");
    matrix.relabel(&order)
}

fn parse_edges(text: &str) -> Result<DistanceMatrix> {
    let mut tokens = Tokens::new(text);
    let n = city_count(&mut tokens)?;
    let m = tokens.next_usize("edge count")?;
    if n == 0 {
        return Err(Error::invalid_input("city count must be at least 1"));
    }

    let mut weights = vec![f64::INFINITY; n * n];
    for i in 0..n {
        weights[i * n + i] = 0.0;
    }
    for edge in 0..m {
        let u = tokens.next_usize("edge endpoint")?;
        let v = tokens.next_usize("edge endpoint")?;
        let w = tokens.next_f64("edge weight")?;
        if u >= n || v >= n {
            return Err(Error::invalid_input(format!(
                "Edge {}: endpoint out of range ({u}, {v}) for {n} cities",
                edge + 1
            )));
        }
        if u == v {
            return Err(Error::invalid_input(format!(
                "Edge {}: self-loop on city {u}",
                edge + 1
            )));
        }
        weights[u * n + v] = w;
        weights[v * n + u] = w;
    }
    tokens.finish()?;

    DistanceMatrix::from_flat(n, weights)
}

fn parse_dense(text: &str) -> Result<DistanceMatrix> {
    let mut tokens = Tokens::new(text);
    let n = city_count(&mut tokens)?;
    let weights = (0..n * n)
        .map(|_| tokens.next_f64("weight"))
        .collect::<Result<Vec<_>>>()?;
    tokens.finish()?;

    DistanceMatrix::from_flat(n, weights)
}

/// Header city count, checked before anything is sized from it.
fn city_count(tokens: &mut Tokens<'_>) -> Result<usize> {
    let n = tokens.next_usize("city count")?;
    if n > CitySet::CAPACITY {
        return Err(Error::invalid_input(format!(
            "{n} cities exceed the supported maximum of {}",
            CitySet::CAPACITY
        )));
    }
    Ok(n)
}

/// Whitespace tokens with 1-based positions for error messages.
struct Tokens<'a> {
    inner: Enumerate<SplitWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace().enumerate(),
        }
    }

    fn next_raw(&mut self, what: &str) -> Result<(usize, &'a str)> {
        self.inner
            .next()
            .map(|(idx, tok)| (idx + 1, tok))
            .ok_or_else(|| Error::invalid_input(format!("unexpected end of input, missing {what}")))
    }

    fn next_usize(&mut self, what: &str) -> Result<usize> {
        let (pos, tok) = self.next_raw(what)?;
        tok.parse().map_err(|_| {
            Error::invalid_input(format!("Token {pos}: invalid {what}: {tok}"))
        })
    }

    fn next_f64(&mut self, what: &str) -> Result<f64> {
        let (pos, tok) = self.next_raw(what)?;
        tok.parse().map_err(|_| {
            Error::invalid_input(format!("Token {pos}: invalid {what}: {tok}"))
        })
    }

    fn finish(mut self) -> Result<()> {
        match self.inner.next() {
            None => Ok(()),
            Some((idx, tok)) => Err(Error::invalid_input(format!(
                "Token {}: unexpected trailing input: {tok}",
                idx + 1
            ))),
        }
    }
}
