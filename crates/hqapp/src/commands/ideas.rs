use super::apply;
use crate::error::Result;
use crate::model::ideas::{Idea, IdeasDocument, DEFAULT_SOURCE};
use crate::model::new_id;
use crate::policy::{take_by_id, LabelSet};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewIdea {
    pub title: String,
    pub body: String,
    pub source: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdeaPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub source: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub fn inbox<S: DocumentStore>(store: &S) -> IdeasDocument {
    store.read()
}

/// New ideas go to the top of the inbox.
pub fn add_idea<S: DocumentStore>(
    store: &S,
    new: NewIdea,
    now: DateTime<Utc>,
) -> Result<IdeasDocument> {
    let idea = Idea {
        id: new_id(),
        title: new.title,
        body: new.body,
        source: new
            .source
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        tags: new.tags,
        created_at: now.into(),
        updated_at: now.into(),
    };
    store.update(move |mut doc: IdeasDocument| {
        doc.ideas.insert(0, idea);
        doc
    })
}

pub fn update_idea<S: DocumentStore>(
    store: &S,
    id: &str,
    patch: IdeaPatch,
    now: DateTime<Utc>,
) -> Result<IdeasDocument> {
    store.update(|mut doc: IdeasDocument| {
        if let Some(idea) = doc.ideas.iter_mut().find(|i| i.id == id) {
            apply(&mut idea.title, patch.title);
            apply(&mut idea.body, patch.body);
            apply(&mut idea.source, patch.source);
            apply(&mut idea.tags, patch.tags);
            idea.updated_at = now.into();
        }
        doc
    })
}

pub fn archive_idea<S: DocumentStore>(
    store: &S,
    id: &str,
    now: DateTime<Utc>,
) -> Result<IdeasDocument> {
    store.update(|mut doc: IdeasDocument| {
        if let Some(mut idea) = take_by_id(&mut doc.ideas, |i| i.id == id) {
            idea.updated_at = now.into();
            doc.archive.insert(0, idea);
        }
        doc
    })
}

pub fn restore_idea<S: DocumentStore>(
    store: &S,
    id: &str,
    now: DateTime<Utc>,
) -> Result<IdeasDocument> {
    store.update(|mut doc: IdeasDocument| {
        if let Some(mut idea) = take_by_id(&mut doc.archive, |i| i.id == id) {
            idea.updated_at = now.into();
            doc.ideas.insert(0, idea);
        }
        doc
    })
}

/// Permanently remove an archived idea. Live ideas must be archived first.
pub fn delete_archived<S: DocumentStore>(store: &S, id: &str) -> Result<IdeasDocument> {
    store.update(|mut doc: IdeasDocument| {
        doc.archive.retain(|i| i.id != id);
        doc
    })
}

pub fn add_tag<S: DocumentStore>(store: &S, tag: &str) -> Result<IdeasDocument> {
    store.update(|mut doc: IdeasDocument| {
        LabelSet::new(&mut doc.tags).add(tag);
        doc
    })
}

pub fn delete_tag<S: DocumentStore>(store: &S, tag: &str) -> Result<IdeasDocument> {
    store.update(|mut doc: IdeasDocument| {
        LabelSet::new(&mut doc.tags).remove(tag);
        doc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{make_store, t};

    fn new(title: &str) -> NewIdea {
        NewIdea {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn add_prepends_with_default_source() {
        let store = make_store();
        add_idea(&store, new("first"), t(0)).unwrap();
        let doc = add_idea(&store, new("second"), t(1)).unwrap();
        assert_eq!(doc.ideas[0].title, "second");
        assert_eq!(doc.ideas[1].title, "first");
        assert_eq!(doc.ideas[0].source, "ivan");
        assert_eq!(doc.tags.len(), 5);
    }

    #[test]
    fn archive_restore_round_trip_moves_to_heads() {
        let store = make_store();
        let doc = add_idea(&store, new("a"), t(0)).unwrap();
        let a = doc.ideas[0].id.clone();
        add_idea(&store, new("b"), t(1)).unwrap();

        let doc = archive_idea(&store, &a, t(2)).unwrap();
        assert_eq!(doc.ideas.len(), 1);
        assert_eq!(doc.archive[0].id, a);
        assert_eq!(doc.archive[0].updated_at, t(2));

        let doc = restore_idea(&store, &a, t(3)).unwrap();
        assert!(doc.archive.is_empty());
        assert_eq!(doc.ideas[0].id, a);
        assert_eq!(doc.ideas[0].updated_at, t(3));
    }

    #[test]
    fn delete_only_touches_archive() {
        let store = make_store();
        let doc = add_idea(&store, new("a"), t(0)).unwrap();
        let a = doc.ideas[0].id.clone();

        let doc = delete_archived(&store, &a).unwrap();
        assert_eq!(doc.ideas.len(), 1);

        archive_idea(&store, &a, t(1)).unwrap();
        let doc = delete_archived(&store, &a).unwrap();
        assert!(doc.archive.is_empty());
        assert!(doc.ideas.is_empty());
    }

    #[test]
    fn update_stamps_updated_at() {
        let store = make_store();
        let doc = add_idea(&store, new("a"), t(0)).unwrap();
        let a = doc.ideas[0].id.clone();

        let doc = update_idea(
            &store,
            &a,
            IdeaPatch {
                tags: Some(vec!["tool".into()]),
                ..Default::default()
            },
            t(4),
        )
        .unwrap();
        assert_eq!(doc.ideas[0].tags, ["tool"]);
        assert_eq!(doc.ideas[0].title, "a");
        assert_eq!(doc.ideas[0].updated_at, t(4));
    }

    #[test]
    fn tags_are_normalized() {
        let store = make_store();
        add_tag(&store, " Podcast ").unwrap();
        let doc = add_tag(&store, "podcast").unwrap();
        assert_eq!(doc.tags.last().unwrap(), "podcast");
        assert_eq!(doc.tags.len(), 6);

        let doc = delete_tag(&store, "Podcast").unwrap();
        assert_eq!(doc.tags.len(), 5);
    }
}
