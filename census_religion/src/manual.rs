/*!

This is the long-form manual for `census_religion` and `relcensus`.

## Input files

`relcensus` reads four JSON files, by default from the current directory:
* `counties.json` the county lookup
* `religious_denominations_2011.json` and `religious_denominations_2022.json` the yearly tables
* `change_between_2011_and_2022_by_district.json` the change table
* `geo.json` (optional) the district boundaries, passed untouched to the map charts

### `counties.json`

A list of counties, each with the identifiers of its districts:

```json
[
  {"name": "Pest", "ids": ["001", "002"]},
  {"name": "Baranya", "ids": ["010"]}
]
```

A district may only be listed under one county.

### Yearly tables

One object per district, with the number of people for each religion:

```json
[
  {"id": "001", "catholic": 100, "calvinist": 20, "lutheran": 3, "orthodox_christian": 0,
   "other_christian": 4, "jewish": 0, "other": 1, "atheist": 12}
]
```

The identifier may be a string or an integer. Strings are kept as they are (including leading
zeros), integers are written in decimal. A table may carry only some of the religions: the
missing ones are not charted, and a religion absent from a single row shows as a blank district.
A value that is not a number (or `null`) is an error.

### Change table

Same shape as the yearly tables, with the keys prefixed by `change_` (`change_catholic`, ...).
The values are fractions: `-0.02` is a loss of 2 percentage points. They are converted to
percentage points, rounded to 2 decimals (half to even), only when producing long rows or the
change map.

## Unknown districts

A district that is not listed in `counties.json` is dropped from the joined table by default,
with a warning in the logs and a count in the `joinReport` section of the output. Pass `--strict`
(or `"joinMode": "strict"` in the configuration) to make it an error instead.

## Configuration file

All the options can be set in a JSON file passed with `--config`:

```json
{
  "assets": {
    "directory": "assets",
    "countiesFile": "counties.json",
    "changeFile": "change_between_2011_and_2022_by_district.json",
    "geoJsonFile": "geo.json",
    "yearFiles": {"2011": "religious_denominations_2011.json"}
  },
  "joinMode": "permissive",
  "outputSettings": {"year": 2022, "religion": "calvinist", "outputFile": "summary.json"}
}
```

Relative paths are resolved from the directory of the configuration file. Command line flags
take precedence over the configuration file.

## Output

The summary is a JSON object with the selection, the county names, the join reports and the chart specifications:
`map`, `religionBar`, `allReligionsBar`, `changeMap` and `changeBar`.
With `--long-csv`, the long table of the selected year is also written as CSV
(`id,county,group,value`).

*/
