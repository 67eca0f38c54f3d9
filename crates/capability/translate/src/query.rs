/// 有序的查询参数。
///
/// 保留到达顺序；同名参数只保留第一个值。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TorqueQuery {
    pairs: Vec<(String, String)>,
}

impl TorqueQuery {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut unique: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            if unique.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            unique.push((key, value));
        }
        Self { pairs: unique }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
