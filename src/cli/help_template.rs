use indoc::indoc;

// Help text template with placeholder
pub const HELP_TEMPLATE: &str = indoc! {r#"
    Examples:
      # Creating a primary hash file with 12 buckets
      %BINARY_NAME% people.db create --buckets 12

      # Inserting and deleting records
      %BINARY_NAME% people.db insert 5 Ada Lovelace "12 St James's Square"
      %BINARY_NAME% people.db delete 5

      # Scanning every record, or a single id
      %BINARY_NAME% people.db scan
      %BINARY_NAME% people.db scan --id 5

      # Building a surname index over existing records
      %BINARY_NAME% people.surname.db index --buckets 7 --primary people.db

      # Inserting into the primary and the index together
      %BINARY_NAME% people.surname.db index-insert 6 Alan Turing "Wilmslow" --primary people.db

      # Looking a record up by surname
      %BINARY_NAME% people.surname.db lookup Turing --primary people.db

      # Displaying bucket statistics
      %BINARY_NAME% people.db stats

    Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostics on stderr.
"#};
