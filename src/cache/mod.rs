pub(crate) mod mutation;
pub(crate) mod notes;

pub(crate) use mutation::MutationGuard;
pub(crate) use notes::NoteCache;
