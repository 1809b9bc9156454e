//! Ordered variant catalogs.

use std::sync::OnceLock;

use reststack_model::{CharacterSet, ContentEncoding, Language, MediaType, Variant};

/// An ordered, append-only list of declared variants.
///
/// Declaration order is semantically significant: on negotiation ties, the
/// first-declared variant wins. Resources typically populate a catalog at
/// construction via [`VariantCatalog::declare`].
#[derive(Debug, Clone, Default)]
pub struct VariantCatalog {
    variants: Vec<Variant>,
}

impl VariantCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variant of the given media type, returning a builder for
    /// its optional metadata. The variant is registered when the builder is
    /// dropped or [`done`](VariantBuilder::done) is called.
    pub fn declare(&mut self, media_type: MediaType) -> VariantBuilder<'_> {
        VariantBuilder {
            catalog: self,
            variant: Some(Variant::new(media_type)),
        }
    }

    /// Append an already-built variant.
    pub fn add(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    /// The declared variants, in declaration order.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Whether no variant is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Number of declared variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }
}

/// Builder for one declared variant's optional metadata.
#[derive(Debug)]
pub struct VariantBuilder<'a> {
    catalog: &'a mut VariantCatalog,
    variant: Option<Variant>,
}

impl VariantBuilder<'_> {
    /// Set the variant's language.
    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.variant = self.variant.take().map(|v| v.with_language(language));
        self
    }

    /// Set the variant's character set.
    #[must_use]
    pub fn character_set(mut self, character_set: CharacterSet) -> Self {
        self.variant = self
            .variant
            .take()
            .map(|v| v.with_character_set(character_set));
        self
    }

    /// Set the variant's content encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: ContentEncoding) -> Self {
        self.variant = self.variant.take().map(|v| v.with_encoding(encoding));
        self
    }

    /// Set the variant's known size.
    #[must_use]
    pub fn size(mut self, size: u64) -> Self {
        self.variant = self.variant.take().map(|v| v.with_size(size));
        self
    }

    /// Finish the declaration explicitly.
    pub fn done(self) {}
}

impl Drop for VariantBuilder<'_> {
    fn drop(&mut self) {
        if let Some(variant) = self.variant.take() {
            self.catalog.variants.push(variant);
        }
    }
}

/// A catalog shared across per-call resource instances, initialized exactly
/// once.
///
/// Resource instances are created per call, but a resource type's variant
/// list is usually static. `SharedCatalog` gives concurrent first callers a
/// race-free one-time initialization (the `OnceLock` blocks losers until
/// the winner's value is visible) without requiring every instance to
/// rebuild the list.
#[derive(Debug, Default)]
pub struct SharedCatalog {
    inner: OnceLock<VariantCatalog>,
}

impl SharedCatalog {
    /// Create an uninitialized shared catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Get the catalog, building it on first access.
    pub fn get_or_init(&self, build: impl FnOnce() -> VariantCatalog) -> &VariantCatalog {
        self.inner.get_or_init(build)
    }
}
