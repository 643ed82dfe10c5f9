//! Filter registry and left-to-right dispatch.
//!
//! Each registered [`FilterSpec`] is a template: a CLI name, a help line, a
//! fixed arity, and a constructor that turns exactly `arity` argument tokens
//! into a [`Filter`]. Dispatch never looks ahead: once a filter name is
//! matched, the next `arity` tokens belong to it even if they spell another
//! filter's name.

use tracing::debug;

use crate::error::{Error, Result};
use crate::image::Image;

use super::{no_args, Anaglyph, Crop, EdgeDetection, Filter, GaussianBlur};

/// Builds a filter from exactly `arity` argument tokens.
pub type Constructor = fn(&[&str]) -> Result<Filter>;

#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub arity: usize,
    pub constructor: Constructor,
}

impl FilterSpec {
    pub const fn new(name: &'static str, help: &'static str, arity: usize, constructor: Constructor) -> Self {
        Self {
            name,
            help,
            arity,
            constructor,
        }
    }

    /// Build a fresh filter value from its argument tokens.
    pub fn instantiate(&self, args: &[&str]) -> Result<Filter> {
        if args.len() != self.arity {
            return Err(Error::argument(format!(
                "{} expects {} argument(s), got {}",
                self.name,
                self.arity,
                args.len()
            )));
        }
        (self.constructor)(args)
    }
}

fn build_crop(args: &[&str]) -> Result<Filter> {
    Crop::from_args(args).map(Filter::Crop)
}

fn build_grayscale(args: &[&str]) -> Result<Filter> {
    no_args(args, Filter::GrayScale)
}

fn build_negative(args: &[&str]) -> Result<Filter> {
    no_args(args, Filter::Negative)
}

fn build_sharpening(args: &[&str]) -> Result<Filter> {
    no_args(args, Filter::Sharpening)
}

fn build_edge(args: &[&str]) -> Result<Filter> {
    EdgeDetection::from_args(args).map(Filter::EdgeDetection)
}

fn build_blur(args: &[&str]) -> Result<Filter> {
    GaussianBlur::from_args(args).map(Filter::GaussianBlur)
}

fn build_anaglyph(args: &[&str]) -> Result<Filter> {
    Anaglyph::from_args(args).map(Filter::Anaglyph)
}

/// The built-in filter set in registration order.
pub const STANDARD_FILTERS: [FilterSpec; 7] = [
    FilterSpec::new("-crop", "crop the image size", 2, build_crop),
    FilterSpec::new("-gs", "converts the image to shades of grey", 0, build_grayscale),
    FilterSpec::new("-neg", "converts the image to a negative", 0, build_negative),
    FilterSpec::new("-sharp", "sharpness enhancement", 0, build_sharpening),
    FilterSpec::new("-edge", "edge detection", 1, build_edge),
    FilterSpec::new("-blur", "gaussian blur", 1, build_blur),
    FilterSpec::new("-anaglyph", "3d anaglyph", 1, build_anaglyph),
];

/// Ordered collection of filter templates keyed by name.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<FilterSpec>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for spec in STANDARD_FILTERS {
            registry.register(spec);
        }
        registry
    }
}

impl Registry {
    pub fn empty() -> Self {
        Self { specs: Vec::new() }
    }

    /// Add a template. Names must be unique.
    pub fn register(&mut self, spec: FilterSpec) -> &mut Self {
        debug_assert!(
            self.names().all(|name| name != spec.name),
            "duplicate filter name {}",
            spec.name
        );
        self.specs.push(spec);
        self
    }

    pub fn lookup(&self, name: &str) -> Result<&FilterSpec> {
        self.specs
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| Error::UnknownFilter(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|spec| spec.name)
    }

    /// Apply filter `name`, taking its arguments from the front of `remaining`.
    ///
    /// # Returns
    /// Number of tokens consumed from `remaining`.
    pub fn invoke<S: AsRef<str>>(&self, name: &str, remaining: &[S], image: &mut Image) -> Result<usize> {
        let spec = self.lookup(name)?;
        if remaining.len() < spec.arity {
            return Err(Error::argument(format!(
                "{} expects {} argument(s), got {}",
                spec.name,
                spec.arity,
                remaining.len()
            )));
        }

        let args: Vec<&str> = remaining[..spec.arity].iter().map(AsRef::as_ref).collect();
        let filter = spec.instantiate(&args)?;
        debug!(filter = spec.name, ?args, "applying filter");
        filter.apply(image);
        Ok(spec.arity)
    }

    /// Run every filter named in `args`, in order, against `image`.
    pub fn apply_all<S: AsRef<str>>(&self, args: &[S], image: &mut Image) -> Result<()> {
        let mut i = 0;
        while i < args.len() {
            let name = args[i].as_ref();
            i += 1;
            i += self.invoke(name, &args[i..], image)?;
        }
        Ok(())
    }

    /// One `name,    help` line per filter, in registration order.
    pub fn help_listing(&self) -> String {
        self.specs
            .iter()
            .map(|spec| format!("{},    {}\n", spec.name, spec.help))
            .collect()
    }
}
