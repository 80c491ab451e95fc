use solana_security_txt::security_txt;

// Contacts and policy live in the repository's SECURITY.md until a deployment publishes its own
security_txt! {
    name: "Sale Controller program",
    project_url: "SECURITY.md",
    contacts: "link:SECURITY.md",
    policy: "SECURITY.md"
}
