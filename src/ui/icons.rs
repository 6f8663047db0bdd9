pub struct Icons;

impl Icons {
    pub const SCHEMA: &str = "📐";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const FILE: &str = "📄";
    pub const TREE: &str = "🌳";
}
