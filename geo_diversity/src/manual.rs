/*!

This is the long-form manual for `geo_diversity` and `confgeo`.

## Input formats

Every input is a table with a header row. It can be a CSV file (`csv`) or an
Excel workbook (`xlsx`). For workbooks, the worksheet can be chosen with
`excelWorksheetName`; otherwise the first worksheet is used.

The columns are found by name, depending on the kind of the input. Other
columns are ignored.

### `accepted`

One row per accepted paper.

```text
Conference,Year,Title,Predominant Continent
nsdi,2020,A paper,NA
cloud,2021,Another paper,
```

### `committee`

One row per program-committee member. When a member has affiliations on
several continents, the codes are joined with `;` and the first one is used.
The codes are written in alphabetical order (`AS;EU;NA`), so this favors
Asia over Europe, and both over North America: a member affiliated in
Europe and North America counts for Europe only. The committee shares of
North America are a lower bound.

```text
Conference,Year,Name,Institution,Continent
osdi,2022,Jane Doe,Some University,EU;NA
```

### `cited`

One row per conference and continent, with the number of citing papers.

```text
Conference,Continent,Num_Papers
nsdi,NA,120
nsdi,AS,80
```

### Affiliations

The percentages of papers with at least one big tech author, with only other
institutions, and with no institution data at all.

```text
Conference,Year,pct_has_big,pct_no_big,pct_all_none
nsdi,2020,35.5,60.2,4.3
```

The big tech percentages can also be given per continent, in long format.
`X0` is the share of all the papers of that conference and year which have a
big tech author from that continent. The shares are averaged over the years.

```text
Conference,Year,level_2,X0
nsdi,2020,pct_big_na,20.1
nsdi,2020,pct_big_eu,3.2
nsdi,2020,pct_big_as,8.0
nsdi,2020,pct_big_other,1.1
```

## Normalization

Conference names are matched without regard to case against a fixed alias
table (`cloud` and `socc` are both SoCC, `ieeecloud` is IEEE Cloud, ...).
Rows of any other conference are dropped.

Continent codes `NA`, `EU` and `AS` are kept, `SA`, `OC` and `AF` are grouped
as `Others`. Empty and unrecognized codes are `Unknown`.

## Statistics

- Distributions: the percentage of each continent per conference. The
  unknown share is the remainder to 100, never negative.
- Diversity: the Gini-Simpson index `1 - Σ p²` over the located continents.
- Ordering: conferences by decreasing share of a continent (North America by
  default), applied to every output table.
- Gaps: committee minus accepted papers, and cited minus accepted papers, over
  North America, Europe, Asia and Other (small continents and unknown
  locations together).

## Configuration

`confgeo` accepts a configuration file in JSON. Relative paths are resolved
against the directory of the configuration file.

```json
{
  "outputSettings": {
    "analysisName": "Systems conferences",
    "outputDirectory": "out",
    "decimalPlaces": 2
  },
  "inputSources": [
    {"kind": "accepted", "provider": "csv", "filePath": "unifiedPaperData.csv"},
    {"kind": "committee", "provider": "csv", "filePath": "unifiedCommitteeData.csv"},
    {"kind": "cited", "provider": "xlsx", "filePath": "citations.xlsx",
     "excelWorksheetName": "Sheet1"}
  ],
  "affiliationSource": {"provider": "csv", "filePath": "big_tech_analysis.csv"},
  "affiliationContinentSource": {"filePath": "big_companies_by_continent_analysis.csv"},
  "rules": {
    "rankingContinent": "NA",
    "keylessPlacement": "append",
    "groupByYear": false,
    "trendContinent": "AS"
  },
  "conferenceAliases": {"usenix atc": "ATC"}
}
```

All the fields of `rules`, `outputSettings.decimalPlaces`,
`affiliationSource`, `affiliationContinentSource` and `conferenceAliases`
are optional.

Instead of a configuration file, the inputs can be given on the command line
with `--papers`, `--committee`, `--citations`, `--affiliations` and
`--affiliations-by-continent`.

## Outputs

Written in the output directory:
- `<kind>_distribution.csv`: `Conference,Year,Continent,Percentage`
- `<kind>_diversity.csv`: `Conference,DiversityIndex`
- `committee_vs_accepted_gap.csv`, `cited_vs_accepted_gap.csv`:
  `Conference,Continent,ValueA,ValueB,Gap`. The gap cell is empty when
  neither side has data.
- `affiliation_long.csv`: `Conference,Year,Affiliation,Percentage`
- `big_tech_by_continent.csv`: `Conference,Continent,Percentage`
- `<continent>_trend.csv`: `Year,Percentage`

The summary of the run is printed as JSON, or written to the path given with
`--out`. With `--reference`, it is compared with a previous summary.

*/
