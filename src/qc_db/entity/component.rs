/// A batch of entities sharing one rating vocabulary.
#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct Component {
    pub id: i64,
}
