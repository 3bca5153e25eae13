//! Catalogue ordonné luminosité normalisée → caractères.
//!
//! Les positions normalisées sont relatives aux extrêmes du jeu actif : tout
//! ajout ou retrait qui déplace `min` ou `max` renormalise le catalogue entier,
//! de sorte que 0.0 et 1.0 restent toujours occupés.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use gc_core::error::CoreError;
use gc_core::traits::GlyphRenderer;

use crate::glyph_brightness::absolute_brightness;

/// Clé du catalogue : luminosité normalisée, ordre total.
#[derive(Clone, Copy, Debug)]
struct Level(f64);

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Level {}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Ordered brightness → characters structure with nearest-value lookup.
///
/// A single active character, or several sharing one absolute brightness,
/// make `min == max`; every active character is then placed at 0.0.
///
/// # Example
/// ```
/// use gc_core::{CoreError, GlyphBitmap, GlyphRenderer};
/// use gc_ascii::catalog::BrightnessCatalog;
///
/// // '.' allume 1 pixel sur 16, '#' en allume 12.
/// struct Tiny;
/// impl GlyphRenderer for Tiny {
///     fn resolution(&self) -> u32 { 4 }
///     fn render(&self, ch: char) -> Result<GlyphBitmap, CoreError> {
///         let lit = match ch { ' ' => 0, '.' => 1, '#' => 12, _ => return Err(CoreError::MissingGlyph { ch }) };
///         Ok(GlyphBitmap::from_fn(4, |x, y| y * 4 + x < lit))
///     }
/// }
///
/// let mut catalog = BrightnessCatalog::new(Box::new(Tiny), ['.', '#']).unwrap();
/// assert_eq!(catalog.query(0.9).unwrap(), '#');
/// catalog.add(' ').unwrap();
/// assert_eq!(catalog.query(0.0).unwrap(), ' ');
/// ```
pub struct BrightnessCatalog {
    renderer: Box<dyn GlyphRenderer>,
    /// Jeu actif → luminosité absolue.
    active: BTreeMap<char, f64>,
    /// Luminosités absolues déjà calculées, y compris pour les caractères retirés.
    absolute: HashMap<char, f64>,
    min: f64,
    max: f64,
    buckets: BTreeMap<Level, BTreeSet<char>>,
}

impl BrightnessCatalog {
    /// Catalogue vide : `min = 1.0`, `max = 0.0`.
    #[must_use]
    pub fn empty(renderer: Box<dyn GlyphRenderer>) -> Self {
        Self {
            renderer,
            active: BTreeMap::new(),
            absolute: HashMap::new(),
            min: 1.0,
            max: 0.0,
            buckets: BTreeMap::new(),
        }
    }

    /// Build a catalog over `chars`.
    ///
    /// # Errors
    /// `CoreError::EmptyCharset` if `chars` is empty, `MissingGlyph` if the
    /// renderer cannot draw one of them.
    pub fn new(
        renderer: Box<dyn GlyphRenderer>,
        chars: impl IntoIterator<Item = char>,
    ) -> Result<Self, CoreError> {
        let mut catalog = Self::empty(renderer);
        for ch in chars {
            let abs = catalog.absolute_of(ch)?;
            catalog.active.insert(ch, abs);
            catalog.min = catalog.min.min(abs);
            catalog.max = catalog.max.max(abs);
        }
        if catalog.active.is_empty() {
            return Err(CoreError::EmptyCharset);
        }
        catalog.renormalize();
        Ok(catalog)
    }

    /// Calcule et met en cache la luminosité absolue des caractères jamais vus,
    /// sans toucher au jeu actif.
    ///
    /// # Errors
    /// `CoreError::MissingGlyph` au premier caractère non rasterisable ; les
    /// luminosités déjà calculées restent en cache.
    pub fn prepare(&mut self, chars: impl IntoIterator<Item = char>) -> Result<(), CoreError> {
        for ch in chars {
            self.absolute_of(ch)?;
        }
        Ok(())
    }

    /// Add `ch` to the active set. Returns `false` if it was already active.
    ///
    /// # Errors
    /// `CoreError::MissingGlyph` if the brightness is not cached and the
    /// renderer cannot draw `ch`. The catalog is unchanged in that case.
    pub fn add(&mut self, ch: char) -> Result<bool, CoreError> {
        if self.active.contains_key(&ch) {
            return Ok(false);
        }
        let abs = self.absolute_of(ch)?;
        self.active.insert(ch, abs);

        if self.active.len() == 1 {
            self.min = abs;
            self.max = abs;
            self.insert(Level(0.0), ch);
        } else if abs > self.min && abs < self.max {
            // Extrêmes inchangés : insertion directe.
            self.insert(Level(self.normalize(abs)), ch);
        } else {
            self.min = self.min.min(abs);
            self.max = self.max.max(abs);
            self.renormalize();
        }
        Ok(true)
    }

    /// Remove `ch` from the active set. Returns `false` if it was not active.
    pub fn remove(&mut self, ch: char) -> bool {
        let Some(abs) = self.active.remove(&ch) else {
            return false;
        };
        let level = Level(self.normalize(abs));
        debug_assert!(
            self.buckets.contains_key(&level),
            "{ch:?} actif sans bucket au niveau {}",
            level.0
        );
        let emptied = match self.buckets.get_mut(&level) {
            Some(bucket) => {
                bucket.remove(&ch);
                bucket.is_empty()
            }
            None => {
                log::warn!("Bucket introuvable pour {ch:?} (niveau {}), reconstruction", level.0);
                // Jeu vide : retombe sur min = 1.0, max = 0.0.
                self.min = self.active.values().copied().fold(1.0, f64::min);
                self.max = self.active.values().copied().fold(0.0, f64::max);
                self.renormalize();
                return true;
            }
        };
        if !emptied {
            return true;
        }
        self.buckets.remove(&level);

        if self.buckets.is_empty() {
            self.min = 1.0;
            self.max = 0.0;
            return true;
        }

        let mut shifted = false;
        if abs == self.min {
            if let Some(lowest) = self.extreme_absolute(true) {
                self.min = lowest;
                shifted = true;
            }
        }
        if abs == self.max {
            if let Some(highest) = self.extreme_absolute(false) {
                self.max = highest;
                shifted = true;
            }
        }
        if shifted {
            self.renormalize();
        }
        true
    }

    /// Character whose normalized brightness is nearest to `target`.
    ///
    /// Below the lowest key → lowest bucket, above the highest → highest
    /// bucket. Equidistant keys resolve to the lower one. Inside a bucket the
    /// smallest code point wins. NaN is treated as 0.0.
    ///
    /// # Errors
    /// `CoreError::EmptyCharset` if no character is active.
    pub fn query(&self, target: f64) -> Result<char, CoreError> {
        let target = if target.is_nan() { 0.0 } else { target };
        let (Some((lo, lo_bucket)), Some((hi, hi_bucket))) =
            (self.buckets.first_key_value(), self.buckets.last_key_value())
        else {
            return Err(CoreError::EmptyCharset);
        };

        if target <= lo.0 {
            return smallest(lo_bucket);
        }
        if target >= hi.0 {
            return smallest(hi_bucket);
        }

        let key = Level(target);
        let above = self.buckets.range(key..).next();
        let below = self.buckets.range(..=key).next_back();
        match (below, above) {
            (Some((floor, floor_bucket)), Some((ceiling, ceiling_bucket))) => {
                if ceiling.0 - target < target - floor.0 {
                    smallest(ceiling_bucket)
                } else {
                    smallest(floor_bucket)
                }
            }
            (Some((_, bucket)), None) | (None, Some((_, bucket))) => smallest(bucket),
            (None, None) => Err(CoreError::EmptyCharset),
        }
    }

    /// Number of active characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// `true` if no character is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// `true` if `ch` is active.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.active.contains_key(&ch)
    }

    /// Active characters in code point order.
    pub fn active_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.active.keys().copied()
    }

    /// Extrêmes absolus `(min, max)` du jeu actif. `(1.0, 0.0)` si vide.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Luminosité normalisée courante de `ch`, `None` s'il n'est pas actif.
    #[must_use]
    pub fn normalized(&self, ch: char) -> Option<f64> {
        self.active.get(&ch).map(|&abs| self.normalize(abs))
    }

    /// Luminosité absolue en cache pour `ch` (actif ou déjà vu).
    #[must_use]
    pub fn cached_absolute(&self, ch: char) -> Option<f64> {
        self.absolute.get(&ch).copied()
    }

    /// Buckets in ascending normalized brightness.
    pub fn buckets(&self) -> impl Iterator<Item = (f64, &BTreeSet<char>)> {
        self.buckets.iter().map(|(level, bucket)| (level.0, bucket))
    }

    fn absolute_of(&mut self, ch: char) -> Result<f64, CoreError> {
        if let Some(&abs) = self.absolute.get(&ch) {
            return Ok(abs);
        }
        let abs = absolute_brightness(self.renderer.as_ref(), ch)?;
        self.absolute.insert(ch, abs);
        Ok(abs)
    }

    #[inline]
    fn normalize(&self, abs: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            (abs - self.min) / span
        } else {
            0.0
        }
    }

    fn insert(&mut self, level: Level, ch: char) {
        self.buckets.entry(level).or_default().insert(ch);
    }

    /// Luminosité absolue du premier caractère du bucket le plus bas (ou haut).
    fn extreme_absolute(&self, lowest: bool) -> Option<f64> {
        let entry = if lowest {
            self.buckets.first_key_value()
        } else {
            self.buckets.last_key_value()
        };
        entry
            .and_then(|(_, bucket)| bucket.first())
            .and_then(|ch| self.active.get(ch))
            .copied()
    }

    fn renormalize(&mut self) {
        let mut buckets: BTreeMap<Level, BTreeSet<char>> = BTreeMap::new();
        for (&ch, &abs) in &self.active {
            buckets
                .entry(Level(self.normalize(abs)))
                .or_default()
                .insert(ch);
        }
        self.buckets = buckets;
        log::debug!(
            "Renormalisation : {} caractères, {} niveaux, min={:.4} max={:.4}",
            self.active.len(),
            self.buckets.len(),
            self.min,
            self.max
        );
    }
}

fn smallest(bucket: &BTreeSet<char>) -> Result<char, CoreError> {
    bucket.first().copied().ok_or(CoreError::EmptyCharset)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering as AtomicOrdering;

    use super::*;
    use crate::testing::StubRenderer;

    fn digits() -> BrightnessCatalog {
        BrightnessCatalog::new(Box::new(StubRenderer::digits()), '0'..='9').unwrap()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
    }

    fn levels(catalog: &BrightnessCatalog) -> Vec<(f64, String)> {
        catalog
            .buckets()
            .map(|(level, bucket)| (level, bucket.iter().collect()))
            .collect()
    }

    #[test]
    fn initialize_spans_unit_interval() {
        let catalog = digits();
        assert_eq!(catalog.range(), (0.1, 1.0));
        assert_eq!(catalog.normalized('0'), Some(0.0));
        assert_eq!(catalog.normalized('9'), Some(1.0));
        assert_eq!(catalog.buckets().count(), 10);
    }

    #[test]
    fn initialize_rejects_empty_set() {
        let err = BrightnessCatalog::new(Box::new(StubRenderer::digits()), std::iter::empty());
        assert!(matches!(err, Err(CoreError::EmptyCharset)));
    }

    #[test]
    fn query_on_empty_catalog_fails() {
        let catalog = BrightnessCatalog::empty(Box::new(StubRenderer::digits()));
        assert_eq!(catalog.query(0.5), Err(CoreError::EmptyCharset));
        assert_eq!(catalog.range(), (1.0, 0.0));
    }

    #[test]
    fn query_saturates_at_both_ends() {
        let catalog = digits();
        assert_eq!(catalog.query(-3.0).unwrap(), '0');
        assert_eq!(catalog.query(0.0).unwrap(), '0');
        assert_eq!(catalog.query(1.0).unwrap(), '9');
        assert_eq!(catalog.query(7.0).unwrap(), '9');
    }

    #[test]
    fn query_picks_nearest_and_ties_go_down() {
        // 'a' → 0.0 et 'b' → 1.0 : le milieu exact revient au plancher.
        let renderer = StubRenderer::new(&[('a', 10), ('b', 30)]);
        let catalog = BrightnessCatalog::new(Box::new(renderer), ['a', 'b']).unwrap();
        assert_eq!(catalog.query(0.5).unwrap(), 'a');
        assert_eq!(catalog.query(0.49).unwrap(), 'a');
        assert_eq!(catalog.query(0.51).unwrap(), 'b');
    }

    #[test]
    fn shared_brightness_prefers_smallest_code_point() {
        let renderer = StubRenderer::new(&[('x', 40), ('b', 40), ('k', 40), (' ', 0)]);
        let catalog = BrightnessCatalog::new(Box::new(renderer), ['x', 'k', 'b', ' ']).unwrap();
        assert_eq!(catalog.query(1.0).unwrap(), 'b');
        assert_eq!(catalog.query(0.8).unwrap(), 'b');
        assert_eq!(catalog.query(0.1).unwrap(), ' ');
    }

    #[test]
    fn single_character_sits_at_zero() {
        let catalog = BrightnessCatalog::new(Box::new(StubRenderer::digits()), ['5']).unwrap();
        assert_eq!(catalog.normalized('5'), Some(0.0));
        for target in [0.0, 0.3, 1.0] {
            assert_eq!(catalog.query(target).unwrap(), '5');
        }
    }

    #[test]
    fn add_interior_keeps_other_positions() {
        let renderer = StubRenderer::new(&[('a', 0), ('m', 25), ('z', 100)]);
        let mut catalog = BrightnessCatalog::new(Box::new(renderer), ['a', 'z']).unwrap();
        assert!(catalog.add('m').unwrap());
        assert_eq!(catalog.normalized('a'), Some(0.0));
        assert_close(catalog.normalized('m'), 0.25);
        assert_eq!(catalog.normalized('z'), Some(1.0));
    }

    #[test]
    fn add_new_max_pushes_old_max_inward() {
        let renderer = StubRenderer::new(&[('a', 10), ('b', 50), ('@', 90)]);
        let mut catalog = BrightnessCatalog::new(Box::new(renderer), ['a', 'b']).unwrap();
        assert_eq!(catalog.normalized('b'), Some(1.0));
        catalog.add('@').unwrap();
        assert_eq!(catalog.normalized('@'), Some(1.0));
        assert_close(catalog.normalized('b'), 0.5);
        assert_eq!(catalog.query(1.0).unwrap(), '@');
    }

    #[test]
    fn add_new_min_lands_at_zero() {
        let renderer = StubRenderer::new(&[(' ', 0), ('a', 20), ('b', 60)]);
        let mut catalog = BrightnessCatalog::new(Box::new(renderer), ['a', 'b']).unwrap();
        catalog.add(' ').unwrap();
        assert_eq!(catalog.normalized(' '), Some(0.0));
        assert_close(catalog.normalized('a'), 1.0 / 3.0);
        assert_eq!(catalog.range(), (0.0, 0.6));
    }

    #[test]
    fn add_is_noop_when_active() {
        let mut catalog = digits();
        let before = levels(&catalog);
        assert!(!catalog.add('3').unwrap());
        assert_eq!(levels(&catalog), before);
    }

    #[test]
    fn add_unknown_glyph_leaves_catalog_intact() {
        let mut catalog = digits();
        let before = levels(&catalog);
        assert_eq!(catalog.add('é'), Err(CoreError::MissingGlyph { ch: 'é' }));
        assert!(!catalog.contains('é'));
        assert_eq!(levels(&catalog), before);
    }

    #[test]
    fn first_add_to_empty_catalog() {
        let mut catalog = BrightnessCatalog::empty(Box::new(StubRenderer::digits()));
        catalog.add('4').unwrap();
        assert_eq!(catalog.range(), (0.5, 0.5));
        assert_eq!(catalog.query(0.9).unwrap(), '4');
        catalog.add('9').unwrap();
        assert_eq!(catalog.normalized('4'), Some(0.0));
        assert_eq!(catalog.normalized('9'), Some(1.0));
    }

    #[test]
    fn remove_min_renormalizes_everything() {
        let mut catalog = digits();
        let before: Vec<f64> = ('1'..='8').filter_map(|c| catalog.normalized(c)).collect();
        assert!(catalog.remove('0'));
        assert_eq!(catalog.range(), (0.2, 1.0));
        assert_eq!(catalog.normalized('1'), Some(0.0));
        assert_eq!(catalog.normalized('9'), Some(1.0));
        let after: Vec<f64> = ('1'..='8').filter_map(|c| catalog.normalized(c)).collect();
        for (old, new) in before.iter().zip(&after) {
            assert_ne!(old, new);
        }
        assert_eq!(catalog.query(0.0).unwrap(), '1');
    }

    #[test]
    fn remove_max_renormalizes() {
        let mut catalog = digits();
        catalog.remove('9');
        assert_eq!(catalog.range(), (0.1, 0.9));
        assert_eq!(catalog.normalized('8'), Some(1.0));
        assert_eq!(catalog.query(1.0).unwrap(), '8');
    }

    #[test]
    fn remove_from_shared_bucket_keeps_extremes() {
        let renderer = StubRenderer::new(&[('a', 10), ('b', 10), ('c', 70)]);
        let mut catalog = BrightnessCatalog::new(Box::new(renderer), ['a', 'b', 'c']).unwrap();
        catalog.remove('a');
        assert_eq!(catalog.range(), (0.1, 0.7));
        assert_eq!(catalog.query(0.0).unwrap(), 'b');
    }

    #[test]
    fn remove_until_empty_resets_range() {
        let mut catalog = BrightnessCatalog::new(Box::new(StubRenderer::digits()), ['1', '7']).unwrap();
        assert!(catalog.remove('1'));
        assert_eq!(catalog.normalized('7'), Some(0.0));
        assert!(catalog.remove('7'));
        assert!(catalog.is_empty());
        assert_eq!(catalog.range(), (1.0, 0.0));
        assert!(!catalog.remove('7'));
        assert_eq!(catalog.query(0.5), Err(CoreError::EmptyCharset));
    }

    #[test]
    fn add_then_remove_is_query_equivalent() {
        let renderer = StubRenderer::new(&[('a', 20), ('b', 45), ('c', 70), ('@', 95), (' ', 0)]);
        let mut catalog = BrightnessCatalog::new(Box::new(renderer), ['a', 'b', 'c']).unwrap();
        let targets: Vec<f64> = (0..=40).map(|i| f64::from(i) / 40.0).collect();
        let before: Vec<char> = targets.iter().map(|&t| catalog.query(t).unwrap()).collect();
        for extra in ['@', ' '] {
            catalog.add(extra).unwrap();
            catalog.remove(extra);
            let after: Vec<char> = targets.iter().map(|&t| catalog.query(t).unwrap()).collect();
            assert_eq!(before, after, "après add/remove de {extra:?}");
        }
    }

    #[test]
    fn readding_reuses_cached_brightness() {
        let renderer = StubRenderer::digits();
        let calls = renderer.call_counter();
        let mut catalog = BrightnessCatalog::new(Box::new(renderer), ['0', '9']).unwrap();
        assert_eq!(calls.load(AtomicOrdering::Relaxed), 2);
        catalog.add('5').unwrap();
        catalog.remove('5');
        catalog.add('5').unwrap();
        assert_eq!(calls.load(AtomicOrdering::Relaxed), 3);
        assert_eq!(catalog.cached_absolute('5'), Some(0.6));
    }

    #[test]
    fn nearest_match_is_monotonic() {
        let catalog = digits();
        // Niveaux k/9 : le point milieu entre deux niveaux départage.
        for k in 0..9u32 {
            let lo = f64::from(k) / 9.0;
            let hi = f64::from(k + 1) / 9.0;
            let mid = (lo + hi) / 2.0;
            let lower = char::from_digit(k, 10).unwrap();
            let upper = char::from_digit(k + 1, 10).unwrap();
            assert_eq!(catalog.query(mid - 0.01).unwrap(), lower);
            assert_eq!(catalog.query(mid + 0.01).unwrap(), upper);
        }
    }

    #[test]
    fn nan_target_maps_to_darkest() {
        assert_eq!(digits().query(f64::NAN).unwrap(), '0');
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "sans bucket")]
    fn remove_detects_missing_bucket() {
        let mut catalog = digits();
        catalog.buckets.clear();
        catalog.remove('3');
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn remove_rebuilds_after_missing_bucket() {
        let mut catalog = digits();
        catalog.buckets.clear();
        assert!(catalog.remove('0'));
        assert_eq!(catalog.range(), (0.2, 1.0));
        assert_eq!(catalog.query(0.0).unwrap(), '1');
        assert_eq!(catalog.query(1.0).unwrap(), '9');
    }
}
