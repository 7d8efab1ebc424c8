/// Posts every fresh store starts with, as `(title, content)` pairs. They have no author.
pub const SEED_POSTS: [(&str, &str); 4] = [
    ("Primeiro Post", "Este é o conteúdo do primeiro post."),
    ("Segundo Post", "Conteúdo relacionado ao segundo post."),
    ("Tutorial Node.js", "Aprenda Node.js neste tutorial completo."),
    ("Node.js Avançado", "Técnicas avançadas de Node.js."),
];
