//! Space-delimited tag lists.
//!
//! An entity's tags are a single string such as `"player red team_a"`. A tag
//! matches only as a whole token bounded by spaces or the ends of the list:
//! `"red"` matches `"blue red"` but not `"reddish"`, `"dark-red"` or
//! `"red\tblue"`.

/// Returns `true` if `tag` appears as a whole token in `tag_list`.
///
/// The empty tag never matches.
#[must_use]
pub fn has_tag(tag_list: &str, tag: &str) -> bool {
    !tag.is_empty() && tag_list.split(' ').any(|token| token == tag)
}

/// Returns an iterator over the non-empty tokens of a tag list.
pub fn iter(tag_list: &str) -> impl Iterator<Item = &str> {
    tag_list.split(' ').filter(|token| !token.is_empty())
}

/// Appends `tag` to the list unless it is already present.
///
/// Returns `true` if the list changed.
pub fn insert(tag_list: &mut String, tag: &str) -> bool {
    if tag.is_empty() || tag.contains(' ') || has_tag(tag_list, tag) {
        return false;
    }
    let kept = tag_list.trim_end_matches(' ').len();
    if kept > 0 {
        tag_list.truncate(kept);
        tag_list.push(' ');
    } else {
        tag_list.clear();
    }
    tag_list.push_str(tag);
    true
}

/// Removes every occurrence of `tag` from the list, normalising separators.
///
/// Returns `true` if the list changed.
pub fn remove(tag_list: &mut String, tag: &str) -> bool {
    if !has_tag(tag_list, tag) {
        return false;
    }
    let kept: Vec<&str> = iter(tag_list).filter(|token| *token != tag).collect();
    *tag_list = kept.join(" ");
    true
}
