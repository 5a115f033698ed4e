//! Target calculator (§4.5): validates candidate target cores against
//! rejection rules A, D, B, C (in that order), selects the greatest
//! survivor (rule F), and otherwise derives a core from the aggregated
//! directives.
//!
//! Malformed candidates (rule E) never reach this module: the keyword
//! parser only ever emits a [`Directive::TargetSet`] for a version that
//! already parsed successfully.

use crate::keyword::Directive;
use crate::version::{Component, Version};

/// Everything the calculator needs about the reachable/repository tag
/// landscape, gathered by the resolver ahead of time.
pub struct TargetContext<'a> {
    /// Highest reachable tag's version, if any (`H`).
    pub highest_reachable: Option<&'a Version>,
    /// Highest reachable *final* tag's core, if any (`Tf`).
    pub highest_reachable_final_core: Option<Version>,
    /// The repository's single highest tag, if any (`R`).
    pub repository_highest: Option<&'a Version>,
    /// Max core among every final tag in the repository, if any (`Rf`).
    pub repository_highest_final_core: Option<Version>,
    /// Hard-coded to `false` on the one path the resolver actually
    /// exercises; kept as a real parameter so the calculator stays
    /// reusable for a caller that does know.
    pub is_head_on_final_tag: bool,
}

/// Rule A, D, B, C in order; `None` means rejected.
fn validate(core: &Version, ctx: &TargetContext<'_>) -> bool {
    if let Some(tf) = &ctx.highest_reachable_final_core {
        if core <= tf {
            return false;
        }
    }

    if ctx.is_head_on_final_tag {
        if let Some(tf) = &ctx.highest_reachable_final_core {
            if core == tf {
                return false;
            }
        }
    }

    if let Some(h) = ctx.highest_reachable {
        if h.is_pre_release() {
            return *core >= h.core();
        }
        return true;
    }

    if let Some(rf) = &ctx.repository_highest_final_core {
        return core > rf;
    }
    if let Some(r) = ctx.repository_highest {
        if r.is_pre_release() {
            return *core >= r.core();
        }
    }
    true
}

/// Rule F: among every candidate that survives rules A/D/B/C, the
/// greatest by version ordering. `candidates` are already bare cores
/// (pre-release/metadata stripped, per `Directive::TargetSet`).
pub fn select_target(candidates: &[Version], ctx: &TargetContext<'_>) -> Option<Version> {
    candidates
        .iter()
        .filter(|c| validate(c, ctx))
        .max()
        .cloned()
}

/// §4.5 steps 1-7: derive a target core purely from aggregated directives
/// and the base tag's version (if any), when no `target:` candidate
/// survived validation.
pub fn derive_core_from_directives(
    directives: &[Directive],
    base: Option<&Version>,
    any_repository_tag: Option<&Version>,
) -> Version {
    let major_set = max_set(directives, |d| matches!(d, Directive::MajorSet(_)), |d| {
        if let Directive::MajorSet(n) = d {
            Some(*n)
        } else {
            None
        }
    });
    let minor_set = max_set(directives, |d| matches!(d, Directive::MinorSet(_)), |d| {
        if let Directive::MinorSet(n) = d {
            Some(*n)
        } else {
            None
        }
    });
    let patch_set = max_set(directives, |d| matches!(d, Directive::PatchSet(_)), |d| {
        if let Directive::PatchSet(n) = d {
            Some(*n)
        } else {
            None
        }
    });

    let has_major = major_set.is_some() || directives.contains(&Directive::MajorChange);
    let has_minor = minor_set.is_some() || directives.contains(&Directive::MinorChange);

    let base_core = base.map(|b| b.core());

    if has_major {
        let next_major = base_core.as_ref().map(|b| b.major() + 1).unwrap_or(1);
        return Version::from_core_unsafe(major_set.unwrap_or(next_major), 0, 0);
    }

    if has_minor {
        let base = base_core.unwrap_or_else(|| Version::from_core_unsafe(0, 0, 0));
        let next_minor = minor_set.unwrap_or(base.minor() + 1);
        return Version::from_core_unsafe(base.major(), next_minor, 0);
    }

    // Relative patch directives never change the outcome over the default:
    // patch increment already happens whenever a base exists. An absolute
    // `PatchSet` still wins even when the base sits on a pre-release.
    let has_patch = patch_set.is_some() || directives.contains(&Directive::PatchChange);

    if let Some(base) = &base {
        if let Some(n) = patch_set {
            return Version::from_core_unsafe(base.major(), base.minor(), n);
        }
        if base.is_pre_release() {
            return base.core();
        }
        let next_patch = base.patch() + 1;
        return Version::from_core_unsafe(base.major(), base.minor(), next_patch);
    }

    if has_patch {
        if let Some(n) = patch_set {
            return Version::from_core_unsafe(0, 0, n);
        }
    }

    if let Some(tag) = any_repository_tag {
        return tag.next(Component::Major);
    }

    Version::from_core_unsafe(0, 1, 0)
}

fn max_set(
    directives: &[Directive],
    is_kind: impl Fn(&Directive) -> bool,
    extract: impl Fn(&Directive) -> Option<u32>,
) -> Option<u32> {
    directives
        .iter()
        .filter(|d| is_kind(d))
        .filter_map(|d| extract(d))
        .max()
}
